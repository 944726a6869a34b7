//! Shared utilities.
//!
//! - [`email`]: SMTP delivery of one-time codes

pub mod email;
