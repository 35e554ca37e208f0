//! Liveness and readiness endpoints

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Readiness report. Catalog sizes are only present when the database answered.
#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub database: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<i64>,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Ready once the schema is in place and the catalog tables can be counted
async fn readyz(State(state): State<AppState>) -> Json<ReadyResponse> {
    let counts = async {
        let books = state.catalog.book_count().await?;
        let authors = state.catalog.author_count().await?;
        Ok::<_, crate::error::CatalogError>((books, authors))
    }
    .await;

    match counts {
        Ok((books, authors)) => Json(ReadyResponse {
            ready: true,
            database: true,
            books: Some(books),
            authors: Some(authors),
        }),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            Json(ReadyResponse {
                ready: false,
                database: false,
                books: None,
                authors: None,
            })
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
