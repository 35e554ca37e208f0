//! HTTP routes for the GraphQL endpoint.
//!
//! POST executes a request after resolving the bearer token into the request
//! context; GET serves the GraphiQL playground to browsers.

use async_graphql::http::GraphiQLSource;
use async_graphql::{ErrorExtensions, ServerError};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::{ACCEPT, AUTHORIZATION};
use axum::response::IntoResponse;
use axum::routing::get;

use crate::app::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/graphql", get(graphiql).post(graphql_handler))
}

async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        axum::response::Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
    } else {
        (
            axum::http::StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    let authorization = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());

    match state.auth.current_user(authorization).await {
        Ok(Some(user)) => {
            tracing::debug!(user_id = %user.0.id, "Request authenticated");
            request = request.data(user);
        }
        Ok(None) => {
            tracing::debug!("Anonymous request");
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to build request context");
            let extended = e.extend();
            let mut error = ServerError::new(format!("Context creation failed: {}", e), None);
            error.extensions = extended.extensions;
            return async_graphql::Response::from_errors(vec![error]).into();
        }
    }

    state.schema.execute(request).await.into()
}
