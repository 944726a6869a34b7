//! Database probes: `/test-db` (plain text) and `/health` (JSON).

pub mod controller;
pub mod router;
