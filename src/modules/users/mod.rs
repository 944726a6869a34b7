//! Account storage shared by the auth, OTP and profile modules. Exposes no
//! routes of its own.

pub mod model;
pub mod service;
