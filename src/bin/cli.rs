use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use ecotrack::logging::init_cli_tracing;
use ecotrack_config::{DatabaseConfig, ServerConfig};
use ecotrack_db::{PoolManager, initialize_schema};

#[derive(Parser)]
#[command(name = "ecotrack-cli")]
#[command(about = "EcoTrack CLI - Database tooling for the EcoTrack API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database if needed and apply the schema script
    InitSchema {
        /// Schema script (defaults to SCHEMA_PATH, then db/schema.sql)
        #[arg(short = 's', long)]
        schema: Option<PathBuf>,
    },
    /// Check that the configured database accepts connections
    CheckDb,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_cli_tracing();

    let cli = Cli::parse();
    let db_config = DatabaseConfig::from_env();

    match cli.command {
        Commands::InitSchema { schema } => {
            let path = schema.unwrap_or_else(|| ServerConfig::from_env().schema_path);
            handle_init_schema(&db_config, path).await
        }
        Commands::CheckDb => handle_check_db(db_config).await,
    }
}

async fn handle_init_schema(db_config: &DatabaseConfig, path: PathBuf) -> ExitCode {
    println!("Applying {} to {}...", path.display(), db_config.database);

    match initialize_schema(db_config, &path).await {
        Ok(report) => {
            println!("✅ Schema applied");
            println!("   Statements applied: {}", report.applied);
            println!("   Already present:    {}", report.skipped);
            if report.warnings.is_empty() {
                ExitCode::SUCCESS
            } else {
                println!("⚠️  {} statement(s) failed:", report.warnings.len());
                for warning in &report.warnings {
                    println!("   - {}", warning);
                }
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("❌ Error applying schema: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn handle_check_db(db_config: DatabaseConfig) -> ExitCode {
    let target = format!("{}:{}/{}", db_config.host, db_config.port, db_config.database);
    let manager = PoolManager::lazy(db_config);

    let healthy = manager.test_connection().await;
    manager.shutdown().await;

    if healthy {
        println!("✅ Database reachable at {}", target);
        ExitCode::SUCCESS
    } else {
        eprintln!("❌ Database unreachable at {}", target);
        ExitCode::FAILURE
    }
}
