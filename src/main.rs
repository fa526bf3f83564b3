//! Book catalog server.
//!
//! Reads its settings from the environment (see `book_catalog::config`),
//! migrates the database and serves the API until Ctrl-C.

use book_catalog::{
    http, migration::Migrator, spawn_token_cleanup, AppState, AuthService, BookService, Config,
};
use dotenvy::dotenv;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("book_catalog=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    info!("Connecting to database");
    let db = Database::connect(config.connect_options()).await?;
    Migrator::up(&db, None).await?;
    info!("Database migrated");

    let auth = AuthService::new(db.clone()).with_token_ttl(config.token_ttl);
    let cleanup = spawn_token_cleanup(auth.clone(), config.cleanup_interval);

    let state = AppState::new(auth, BookService::new(db));
    let app = http::router(state, &config.api_prefix);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Server starting on http://{}{}", config.bind_addr, config.api_prefix);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
