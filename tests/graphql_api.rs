//! Integration tests for the HTTP surface
//!
//! These drive the full Axum app in-process:
//! - POST /graphql with and without bearer tokens
//! - Request context failures for bad tokens
//! - GET /graphql and the health endpoints

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use library_backend::app::{build_app, build_state};
use library_backend::client;
use library_backend::config::Config;
use library_backend::db::Database;

async fn app() -> Router {
    let config = Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("integration-secret".to_string()),
        _ => None,
    })
    .unwrap();
    let db = Database::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    build_app(build_state(&config, db))
}

async fn post_graphql(
    app: &Router,
    query: &str,
    variables: Value,
    authorization: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let body = json!({ "query": query, "variables": variables }).to_string();

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, uri: &str, accept: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(accept) = accept {
        builder = builder.header(header::ACCEPT, accept);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// Create a user and log in, returning the raw token
async fn login(app: &Router) -> String {
    let (_, body) = post_graphql(
        app,
        r#"mutation { createUser(username: "robert", favoriteGenre: "agile") { username } }"#,
        json!({}),
        None,
    )
    .await;
    assert_eq!(body["data"]["createUser"]["username"], json!("robert"));

    let (_, body) = post_graphql(
        app,
        client::LOGIN,
        json!({ "username": "robert", "password": "password" }),
        None,
    )
    .await;
    body["data"]["login"]["value"]
        .as_str()
        .expect("login returns a token")
        .to_string()
}

// ============================================================================
// Authentication over HTTP
// ============================================================================

#[tokio::test]
async fn test_me_with_bearer_token() {
    let app = app().await;
    let token = login(&app).await;

    let (status, body) = post_graphql(&app, client::ME, json!({}), Some(&format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["me"],
        json!({ "username": "robert", "favoriteGenre": "agile" })
    );
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = app().await;
    let token = login(&app).await;

    let (_, body) = post_graphql(&app, client::ME, json!({}), Some(&format!("bearer {token}"))).await;
    assert_eq!(body["data"]["me"]["username"], json!("robert"));
}

#[tokio::test]
async fn test_anonymous_and_non_bearer_requests() {
    let app = app().await;
    let token = login(&app).await;

    let (_, body) = post_graphql(&app, client::ME, json!({}), None).await;
    assert_eq!(body["data"]["me"], Value::Null);

    let (_, body) = post_graphql(&app, client::ME, json!({}), Some(&format!("Basic {token}"))).await;
    assert_eq!(body["data"]["me"], Value::Null);
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_invalid_token_fails_request() {
    let app = app().await;

    let (_, body) = post_graphql(&app, client::ALL_AUTHORS, json!({}), Some("Bearer not-a-token")).await;
    let message = body["errors"][0]["message"].as_str().unwrap();
    assert!(message.starts_with("Context creation failed"), "{message}");
    assert!(body["data"].is_null());
}

// ============================================================================
// Catalog over HTTP
// ============================================================================

#[tokio::test]
async fn test_add_book_requires_token() {
    let app = app().await;
    let variables = json!({
        "title": "Clean Code",
        "author": "Robert Martin",
        "published": 2008,
        "genres": ["refactoring"]
    });

    let (_, body) = post_graphql(&app, client::CREATE_BOOK, variables.clone(), None).await;
    assert_eq!(body["errors"][0]["message"], json!("Not authenticated"));
    assert_eq!(body["errors"][0]["extensions"]["code"], json!("UNAUTHENTICATED"));

    let token = login(&app).await;
    let auth = format!("Bearer {token}");
    let (_, body) = post_graphql(&app, client::CREATE_BOOK, variables, Some(&auth)).await;
    assert_eq!(body["data"]["addBook"]["title"], json!("Clean Code"));

    let (_, body) = post_graphql(
        &app,
        "query { bookCount authorCount }",
        json!({}),
        None,
    )
    .await;
    assert_eq!(body["data"], json!({ "bookCount": 1, "authorCount": 1 }));

    let (_, body) = post_graphql(&app, client::ALL_AUTHORS, json!({}), None).await;
    assert_eq!(
        body["data"]["allAuthors"],
        json!([{ "name": "Robert Martin", "born": null, "bookCount": 1 }])
    );
}

#[tokio::test]
async fn test_short_title_reports_invalid_args() {
    let app = app().await;
    let token = login(&app).await;

    let (_, body) = post_graphql(
        &app,
        client::CREATE_BOOK,
        json!({ "title": "abc", "author": "Robert Martin", "published": 2008, "genres": [] }),
        Some(&format!("Bearer {token}")),
    )
    .await;
    let error = &body["errors"][0];
    assert_eq!(error["extensions"]["code"], json!("BAD_USER_INPUT"));
    assert_eq!(error["extensions"]["invalidArgs"]["title"], json!("abc"));
}

#[tokio::test]
async fn test_empty_filters_return_every_book() {
    let app = app().await;
    let token = login(&app).await;
    let auth = format!("Bearer {token}");
    for (title, author, genre) in [
        ("Clean Code", "Robert Martin", "refactoring"),
        ("Crime and punishment", "Fyodor Dostoevsky", "crime"),
    ] {
        post_graphql(
            &app,
            client::CREATE_BOOK,
            json!({ "title": title, "author": author, "published": 2008, "genres": [genre] }),
            Some(&auth),
        )
        .await;
    }

    let (_, body) = post_graphql(&app, client::BOOKS_BY_GENRE, json!({ "genre": "" }), None).await;
    assert_eq!(body["data"]["allBooks"].as_array().map(Vec::len), Some(2));

    let (_, body) = post_graphql(
        &app,
        r#"query { allBooks(author: "", genre: "crime") { title } }"#,
        json!({}),
        None,
    )
    .await;
    assert_eq!(body["data"]["allBooks"], json!([{ "title": "Crime and punishment" }]));
}

// ============================================================================
// Plain HTTP routes
// ============================================================================

#[tokio::test]
async fn test_get_graphql() {
    let app = app().await;

    let (status, body) = get(&app, "/graphql", Some("text/html")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("graphiql"));

    let (status, _) = get(&app, "/graphql", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app().await;

    let (status, body) = get(&app, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["service"], json!("library-backend"));

    let (status, body) = get(&app, "/readyz", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({ "ready": true, "database": true, "books": 0, "authors": 0 })
    );

    let token = login(&app).await;
    post_graphql(
        &app,
        client::CREATE_BOOK,
        json!({ "title": "Clean Code", "author": "Robert Martin", "published": 2008, "genres": [] }),
        Some(&format!("Bearer {token}")),
    )
    .await;

    let (_, body) = get(&app, "/readyz", None).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["books"], json!(1));
    assert_eq!(body["authors"], json!(1));
}
