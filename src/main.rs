use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use ecotrack::logging::init_tracing;
use ecotrack::metrics::init_metrics;
use ecotrack::router::{RateLimiters, build_router};
use ecotrack::state::AppState;
use ecotrack_config::{DatabaseConfig, ServerConfig};
use ecotrack_db::{PoolManager, initialize_schema};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

const RATE_LIMIT_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let _log_guard = init_tracing();

    let metrics_handle = init_metrics().unwrap_or_else(|e| {
        warn!(error = %e, "Prometheus exporter not installed, /metrics disabled");
        None
    });

    let server_config = ServerConfig::from_env();
    let pool_manager = Arc::new(PoolManager::new(DatabaseConfig::from_env()));

    // The pool is required; nothing is served without it. Only the server and
    // credentials are checked here since DB_NAME may not exist yet.
    if let Err(e) = pool_manager.initialize().await {
        error!(error = %e, "Failed to initialize database pool");
        return ExitCode::FAILURE;
    }

    match initialize_schema(pool_manager.config(), &server_config.schema_path).await {
        Ok(report) => info!(
            applied = report.applied,
            skipped = report.skipped,
            warnings = report.warnings.len(),
            "Database schema initialized"
        ),
        Err(e) => warn!(error = %e, "Schema initialization failed, continuing without it"),
    }

    if !pool_manager.test_connection().await {
        error!(database = %pool_manager.config().database, "Database is not usable after schema bootstrap");
        pool_manager.shutdown().await;
        return ExitCode::FAILURE;
    }

    let state = match AppState::from_env(Arc::clone(&pool_manager)).await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            return ExitCode::FAILURE;
        }
    };

    let limiters = RateLimiters::from_state(&state);
    let prune_limiters = limiters.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(RATE_LIMIT_PRUNE_INTERVAL).await;
            prune_limiters.prune();
        }
    });

    let app = build_router(state, &limiters, metrics_handle);

    let addr = server_config.socket_addr();
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "Failed to bind listener");
            pool_manager.shutdown().await;
            return ExitCode::FAILURE;
        }
    };

    info!("Server running on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Scalar UI available at http://{}/scalar", addr);

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    pool_manager.shutdown().await;

    match served {
        Ok(()) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
