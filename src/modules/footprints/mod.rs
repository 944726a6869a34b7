//! Activity records converted to kg CO2e.
//!
//! [`calculator`] holds the emission factor table and the pure conversion;
//! the service persists records and aggregates them per user.

pub mod calculator;
pub mod controller;
pub mod model;
pub mod router;
pub mod service;
