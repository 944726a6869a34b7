//! Cross-cutting request handling.
//!
//! - [`auth`]: `AuthUser` extractor and the auth cookie helpers
//! - [`cors`]: origin allow-list enforcement and the CORS header layer
//! - [`rate_limit`]: per-client request rate limiting
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`, or the `token` cookie set
//!    at login
//! 2. `AuthUser` verifies the JWT and exposes its claims
//! 3. Handler executes with the authenticated user id
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn me(auth_user: AuthUser) -> Result<Json<User>, AppError> {
//!     let user_id = auth_user.user_id()?;
//!     // ...
//! }
//! ```

pub mod auth;
pub mod cors;
pub mod rate_limit;
