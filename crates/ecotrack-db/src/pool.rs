//! Process-wide MySQL connection pool.
//!
//! [`PoolManager`] owns at most one [`MySqlPool`]. The pool is built on the
//! first call to [`PoolManager::initialize`] or [`PoolManager::get`]; callers
//! racing on that first call all wait on the same initialization and receive
//! the same pool. The manager is shared through `Arc` in the application
//! state and closes the pool on [`PoolManager::shutdown`].

use std::sync::atomic::{AtomicUsize, Ordering};

use ecotrack_config::DatabaseConfig;
use sqlx::Connection;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlPool, MySqlPoolOptions};
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument};

use crate::error::DbError;

/// How the pool opens its first connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectMode {
    /// Open and ping an administrative connection (no database selected)
    /// while building the pool, so bad credentials or an unreachable host
    /// fail `initialize`. A missing `DB_NAME` does not, which lets the schema
    /// bootstrap create it afterwards.
    Eager,
    /// Build the pool without touching the network; failures surface on the
    /// first acquire.
    Lazy,
}

/// Options for the application database (`DB_NAME` selected).
pub fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    admin_connect_options(config).database(&config.database)
}

/// Options for an administrative connection with no database selected.
pub fn admin_connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
}

fn pool_options(config: &DatabaseConfig) -> MySqlPoolOptions {
    // Waiters beyond max_connections queue without a length limit and give up
    // after acquire_timeout.
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
}

#[derive(Debug)]
pub struct PoolManager {
    config: DatabaseConfig,
    mode: ConnectMode,
    pool: OnceCell<MySqlPool>,
    constructions: AtomicUsize,
}

impl PoolManager {
    pub fn new(config: DatabaseConfig) -> Self {
        Self::with_mode(config, ConnectMode::Eager)
    }

    pub fn lazy(config: DatabaseConfig) -> Self {
        Self::with_mode(config, ConnectMode::Lazy)
    }

    pub fn with_mode(config: DatabaseConfig, mode: ConnectMode) -> Self {
        Self {
            config,
            mode,
            pool: OnceCell::new(),
            constructions: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.initialized()
    }

    /// Number of times a pool build was started, including failed attempts.
    pub fn construction_count(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }

    /// Returns the existing pool, or builds it.
    ///
    /// Callers that arrive while another caller is building wait for that
    /// build and receive its pool; only the caller that builds logs the
    /// creation. A failed build leaves the manager uninitialized so a later
    /// call can retry.
    #[instrument(skip(self), fields(host = %self.config.host, database = %self.config.database))]
    pub async fn initialize(&self) -> Result<&MySqlPool, DbError> {
        let mut built = false;
        let pool = self
            .pool
            .get_or_try_init(|| {
                built = true;
                self.create_pool()
            })
            .await?;
        if !built {
            debug!("Database pool already initialized");
        }
        Ok(pool)
    }

    pub async fn get(&self) -> Result<&MySqlPool, DbError> {
        match self.pool.get() {
            Some(pool) => Ok(pool),
            None => self.initialize().await,
        }
    }

    /// Acquires a connection, pings it and releases it. Never fails: any error
    /// is logged and reported as `false`.
    pub async fn test_connection(&self) -> bool {
        match self.ping().await {
            Ok(()) => {
                info!("Database connection test successful");
                true
            }
            Err(e) => {
                error!(error = %e, "Database connection test failed");
                false
            }
        }
    }

    async fn ping(&self) -> Result<(), DbError> {
        let pool = self.get().await?;
        let mut conn = pool.acquire().await?;
        conn.ping().await?;
        Ok(())
    }

    /// Closes the pool if one was created. Further acquires fail.
    pub async fn shutdown(&self) {
        if let Some(pool) = self.pool.get() {
            if !pool.is_closed() {
                pool.close().await;
                info!("Database pool closed");
            }
        }
    }

    /// Closes and forgets the pool; the next `initialize` builds a new one.
    pub async fn reset(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
        }
        self.constructions.store(0, Ordering::SeqCst);
    }

    /// Reachability and credential check against the server itself.
    async fn check_server(&self) -> Result<(), sqlx::Error> {
        let mut conn = MySqlConnection::connect_with(&admin_connect_options(&self.config)).await?;
        conn.ping().await?;
        conn.close().await
    }

    async fn create_pool(&self) -> Result<MySqlPool, DbError> {
        self.constructions.fetch_add(1, Ordering::SeqCst);

        if self.mode == ConnectMode::Eager {
            self.check_server().await.map_err(|e| {
                error!(error = %e, "Database pool initialization failed");
                DbError::Connect(e)
            })?;
        }

        let pool = pool_options(&self.config).connect_lazy_with(connect_options(&self.config));

        info!(
            max_connections = self.config.max_connections,
            mode = ?self.mode,
            "MySQL connection pool created"
        );
        Ok(pool)
    }
}
