//! Library Backend - catalog of authors and books over GraphQL
//!
//! Entry point: loads configuration, prepares the database and serves the
//! API at /graphql.

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_backend::app;
use library_backend::config::Config;
use library_backend::db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting Library Backend");

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    tracing::info!("connecting to {}", config.database_url);
    let db = Database::connect(&config.database_url, config.database_max_connections).await?;
    db.migrate().await?;
    tracing::info!("connected to the database");

    let state = app::build_state(&config, db);
    let app = app::build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let host = config.host.as_deref().unwrap_or("localhost");
    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://{}:{}/graphql", host, config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
