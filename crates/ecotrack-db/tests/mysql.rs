//! Tests against a live MySQL server configured through the `DB_*`
//! variables. Run with `cargo test -p ecotrack-db -- --ignored`.

use std::path::PathBuf;
use std::time::Duration;

use ecotrack_config::DatabaseConfig;
use ecotrack_db::{PoolManager, admin_connect_options, initialize_schema};
use sqlx::Connection;
use sqlx::mysql::MySqlConnection;

fn schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../db/schema.sql")
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_schema_bootstrap_is_idempotent() {
    let config = DatabaseConfig::from_env();

    let first = initialize_schema(&config, &schema_path()).await.unwrap();
    assert!(first.warnings.is_empty(), "warnings: {:?}", first.warnings);

    let second = initialize_schema(&config, &schema_path()).await.unwrap();
    assert!(second.warnings.is_empty(), "warnings: {:?}", second.warnings);
    assert_eq!(second.applied + second.skipped, first.applied + first.skipped);
}

/// Same config, pointed at a database that is dropped first.
async fn fresh_database_config(suffix: &str) -> DatabaseConfig {
    let mut config = DatabaseConfig::from_env();
    config.database = format!("{}_{suffix}", config.database);
    config.acquire_timeout = Duration::from_secs(5);

    let mut admin = MySqlConnection::connect_with(&admin_connect_options(&config))
        .await
        .unwrap();
    sqlx::raw_sql(&format!("DROP DATABASE IF EXISTS `{}`", config.database))
        .execute(&mut admin)
        .await
        .unwrap();
    admin.close().await.unwrap();

    config
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_startup_sequence_creates_missing_database() {
    let config = fresh_database_config("fresh_startup").await;

    // Pool first, then schema, then a ping through the pool.
    let manager = PoolManager::new(config.clone());
    manager.initialize().await.unwrap();
    assert_eq!(manager.construction_count(), 1);

    let report = initialize_schema(&config, &schema_path()).await.unwrap();
    assert!(report.applied > 0);
    assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);

    assert!(manager.test_connection().await);

    let pool = manager.get().await.unwrap();
    let (tables,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ?",
    )
    .bind(&config.database)
    .fetch_one(pool)
    .await
    .unwrap();
    assert_eq!(tables, 3);

    manager.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_eager_initialize_does_not_need_database() {
    let config = fresh_database_config("fresh_missing").await;

    let manager = PoolManager::new(config);
    manager.initialize().await.unwrap();
    // The database is still missing, so only the connection test notices.
    assert!(!manager.test_connection().await);
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_eager_pool_and_probe() {
    let config = DatabaseConfig::from_env();

    let manager = PoolManager::new(config.clone());
    manager.initialize().await.unwrap();
    initialize_schema(&config, &schema_path()).await.unwrap();

    let first = manager.initialize().await.unwrap() as *const _;
    let second = manager.initialize().await.unwrap() as *const _;
    assert_eq!(first, second);
    assert_eq!(manager.construction_count(), 1);

    assert!(manager.test_connection().await);
    manager.shutdown().await;
    assert!(!manager.test_connection().await);
}

#[tokio::test]
async fn test_missing_schema_file_is_reported() {
    let config = DatabaseConfig::from_env();
    let result = initialize_schema(&config, "does/not/exist.sql".as_ref()).await;
    assert!(matches!(
        result,
        Err(ecotrack_db::DbError::SchemaRead { .. })
    ));
}
