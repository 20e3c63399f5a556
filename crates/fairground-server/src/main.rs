//! Fairground Server — application entry point.
//!
//! Bootstraps structured logging, reads the store configuration from
//! the environment, connects to SurrealDB, and brings the schema up
//! to date. The HTTP transport in front of the fair services is
//! provided by the platform gateway and is not part of this binary.

use fairground_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Store settings from `FAIRGROUND_DB_*` environment variables,
/// falling back to the local-development defaults.
fn db_config_from_env() -> DbConfig {
    let defaults = DbConfig::default();
    DbConfig {
        url: env_or("FAIRGROUND_DB_URL", &defaults.url),
        namespace: env_or("FAIRGROUND_DB_NAMESPACE", &defaults.namespace),
        database: env_or("FAIRGROUND_DB_DATABASE", &defaults.database),
        username: env_or("FAIRGROUND_DB_USERNAME", &defaults.username),
        password: env_or("FAIRGROUND_DB_PASSWORD", &defaults.password),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("fairground=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Fairground server...");

    let config = db_config_from_env();
    let db = match DbManager::connect(&config).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(err) = fairground_db::run_migrations(db.client()).await {
        tracing::error!(error = %err, "Failed to run schema migrations");
        std::process::exit(1);
    }

    // TODO: mount the gateway transport over FairService and
    // EnrollmentService once the gateway contract is finalized.

    tracing::info!("Fairground server stopped.");
}
