//! Library catalog backend
//!
//! A GraphQL API over a catalog of authors and books, with user accounts and
//! signed login tokens. Everything is served from /graphql.

pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod services;
