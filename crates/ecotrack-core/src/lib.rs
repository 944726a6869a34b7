//! # EcoTrack Core
//!
//! Core types, errors, and utilities for the EcoTrack API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Offset pagination for list endpoints
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use ecotrack_core::errors::AppError;
//! use ecotrack_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Footprint not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod pagination;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
