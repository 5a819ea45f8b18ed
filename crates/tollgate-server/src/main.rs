//! Tollgate Server — application entry point.

mod config;

use tracing_subscriber::EnvFilter;

use tollgate_auth::{AuthService, JwtTokenIssuer};
use tollgate_db::DbManager;
use tollgate_db::repository::SurrealUserRepository;

use crate::config::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("tollgate=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Tollgate server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration error");
            std::process::exit(1);
        }
    };

    let db = match DbManager::connect(&config.db).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = tollgate_db::run_migrations(db.client()).await {
        tracing::error!(error = %e, "Migration failed");
        std::process::exit(1);
    }

    let users = match config.auth.pepper.clone() {
        Some(pepper) => SurrealUserRepository::with_pepper(db.client().clone(), pepper),
        None => SurrealUserRepository::new(db.client().clone()),
    };
    let issuer = JwtTokenIssuer::new(config.auth.clone());
    let _auth = AuthService::new(users, issuer, config.auth);

    tracing::info!("Authentication service ready");

    // TODO: Start REST API server mapping outcomes onto transport
    // responses (issue/renew/revoke endpoints).

    tracing::info!("Tollgate server stopped.");
}
