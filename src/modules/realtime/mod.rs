//! Live aggregates across all users, polled by dashboards. Nothing here
//! identifies a user beyond a first-name display label.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
