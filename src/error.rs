//! Domain errors surfaced to GraphQL clients.
//!
//! `Authentication` and `UserInput` are the two user-visible kinds; each maps to
//! an error `code` extension, and user input errors also carry the offending
//! arguments as `invalidArgs`.

use async_graphql::{ErrorExtensions, Value};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Authentication(String),

    #[error("{message}")]
    UserInput {
        message: String,
        invalid_args: serde_json::Value,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub fn not_authenticated() -> Self {
        Self::Authentication("Not authenticated".to_string())
    }

    pub fn user_input(message: impl Into<String>, args: &impl Serialize) -> Self {
        Self::UserInput {
            message: message.into(),
            invalid_args: serde_json::to_value(args).unwrap_or(serde_json::Value::Null),
        }
    }

    /// Error code reported in the GraphQL `extensions.code` field
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "UNAUTHENTICATED",
            Self::UserInput { .. } => "BAD_USER_INPUT",
            Self::Store(_) | Self::Token(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ErrorExtensions for CatalogError {
    fn extend(&self) -> async_graphql::Error {
        if matches!(self, Self::Store(_) | Self::Token(_)) {
            tracing::error!(error = %self, "Unhandled resolver error");
        }

        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            if let Self::UserInput { invalid_args, .. } = self {
                let args = Value::from_json(invalid_args.clone()).unwrap_or(Value::Null);
                e.set("invalidArgs", args);
            }
        })
    }
}
