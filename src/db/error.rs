//! Write-time constraint errors raised by the repositories.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("`{field}` is required")]
    Required { field: &'static str },

    #[error("`{field}` is shorter than the minimum allowed length ({min})")]
    TooShort { field: &'static str, min: usize },

    #[error("duplicate key: `{field}` must be unique")]
    Duplicate { field: &'static str },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Check a required text field against its minimum length (in characters).
pub fn check_length(field: &'static str, value: &str, min: usize) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::Required { field });
    }
    if value.chars().count() < min {
        return Err(StoreError::TooShort { field, min });
    }
    Ok(())
}

/// Map a unique-index violation on `field` to [StoreError::Duplicate].
pub fn unique_violation(field: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Duplicate { field }
        }
        _ => StoreError::Database(err),
    }
}
