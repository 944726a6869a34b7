//! # EcoTrack API
//!
//! Backend for a carbon-footprint tracking application, built with Axum,
//! SQLx and MySQL.
//!
//! ## Overview
//!
//! - **Authentication**: email/password login issuing a JWT in the response
//!   body and in an HttpOnly cookie
//! - **OTP**: emailed one-time codes for email verification and passwordless
//!   login
//! - **Footprints**: activity records converted to kg CO2e with a built-in
//!   emission factor table
//! - **Profile**: personal details, monthly goal and running totals
//! - **Realtime**: live aggregates, an anonymized activity feed and a
//!   leaderboard
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── ecotrack-core/    # AppError, password hashing, pagination
//! ├── ecotrack-config/  # Environment-driven configuration
//! ├── ecotrack-db/      # Pool manager and schema bootstrap
//! └── ecotrack-auth/    # JWT claims and token utilities
//! src/
//! ├── middleware/       # Auth extractor, origin policy, rate limiting
//! ├── modules/          # Feature modules
//! │   ├── auth/
//! │   ├── otp/
//! │   ├── footprints/
//! │   ├── profile/
//! │   ├── realtime/
//! │   ├── health/      # /test-db and /health
//! │   └── users/       # Shared user queries
//! └── utils/            # Email delivery
//! ```
//!
//! Each feature module follows the same layout: `controller.rs` (handlers),
//! `service.rs` (queries and rules), `model.rs` (DTOs and rows) and
//! `router.rs`.
//!
//! ## Startup
//!
//! 1. Initialize the connection pool (fatal if the server is unreachable or
//!    rejects the credentials; `DB_NAME` may not exist yet)
//! 2. Apply `db/schema.sql`, creating `DB_NAME` if needed (best effort)
//! 3. Ping through the pool (fatal on failure)
//! 4. Bind `HOST:PORT` (default `0.0.0.0:5000`) and serve
//!
//! ## Environment Variables
//!
//! ```bash
//! DB_HOST=localhost
//! DB_USER=root
//! DB_PASSWORD=root
//! DB_NAME=ecotrack
//! PORT=5000
//! JWT_SECRET=your-secure-secret-key
//! ALLOWED_ORIGINS=http://localhost:5505,http://127.0.0.1:5505
//! RATE_LIMIT_TRUSTED_PROXIES=10.0.0.1
//! ```
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:5000/swagger-ui`
//! - Scalar: `http://localhost:5000/scalar`

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use ecotrack_auth;
pub use ecotrack_config;
pub use ecotrack_core;
pub use ecotrack_db;
