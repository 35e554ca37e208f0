//! Application state and HTTP router construction.
//!
//! Used by `main` and by the integration tests to build the Axum app.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::graphql::{CatalogSchema, build_schema};
use crate::services::{AuthConfig, AuthService, CatalogService};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub schema: CatalogSchema,
    pub auth: Arc<AuthService>,
    pub catalog: Arc<CatalogService>,
}

/// Construct the domain services and the schema on top of a connected database.
pub fn build_state(config: &Config, db: Database) -> AppState {
    let auth = Arc::new(AuthService::new(db.clone(), AuthConfig::from(config)));
    let catalog = Arc::new(CatalogService::new(db));
    let schema = build_schema(catalog.clone(), auth.clone());

    AppState {
        schema,
        auth,
        catalog,
    }
}

/// Build the full Axum router: /graphql, health endpoints and layers.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::health::router())
        .merge(api::graphql::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
