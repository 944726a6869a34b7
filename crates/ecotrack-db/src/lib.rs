//! # EcoTrack DB
//!
//! MySQL connection pool management and schema bootstrap for the EcoTrack API.
//!
//! - [`pool`]: [`PoolManager`], the lifecycle object that creates exactly one
//!   connection pool on first use and exposes a health probe
//! - [`schema`]: applies `db/schema.sql` statement by statement, tolerating
//!   objects that already exist
//!
//! # Example
//!
//! ```ignore
//! use ecotrack_config::DatabaseConfig;
//! use ecotrack_db::{PoolManager, initialize_schema};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ecotrack_db::DbError> {
//!     let config = DatabaseConfig::from_env();
//!     let manager = PoolManager::new(config.clone());
//!     let pool = manager.initialize().await?;
//!     initialize_schema(&config, "db/schema.sql".as_ref()).await?;
//!     assert!(manager.test_connection().await);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod pool;
pub mod schema;

pub use error::DbError;
pub use pool::{ConnectMode, PoolManager, admin_connect_options, connect_options};
pub use schema::{SchemaReport, apply_schema, initialize_schema, split_statements};

// Re-export MySqlPool for convenience
pub use sqlx::MySqlPool;
