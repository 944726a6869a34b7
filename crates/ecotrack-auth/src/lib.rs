//! # EcoTrack Auth
//!
//! Authentication types and JWT utilities for the EcoTrack API.
//!
//! - [`claims`]: JWT claim structure carried by access tokens
//! - [`jwt`]: Token creation and verification
//!
//! Tokens are delivered both in the login response body and in an HttpOnly
//! `token` cookie; the server accepts either.
//!
//! # Example
//!
//! ```ignore
//! use ecotrack_auth::{create_access_token, verify_token};
//! use ecotrack_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(42, "user@example.com", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.user_id()?, 42);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{AUTH_COOKIE_NAME, create_access_token, verify_token};
