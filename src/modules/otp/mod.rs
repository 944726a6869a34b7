//! One-time codes sent by email, for verifying an address or signing in
//! without a password.
//!
//! Only a SHA-256 hash of each code is stored. Requesting a new code
//! invalidates the previous unconsumed one for the same email and purpose.

pub mod code;
pub mod controller;
pub mod model;
pub mod router;
pub mod service;
