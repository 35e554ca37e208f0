//! GraphQL API
//!
//! This is the single API surface of the library backend. Queries and
//! mutations live in per-domain objects under `queries/` and `mutations/` and
//! are merged into `QueryRoot`/`MutationRoot` in `schema.rs`.

pub mod auth;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::AuthExt;
pub use schema::{CatalogSchema, MutationRoot, QueryRoot, build_schema};
