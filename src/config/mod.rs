//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for logging the playground URL)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// SQLite connection string, e.g. `sqlite:./data/library.db` or `sqlite::memory:`
    pub database_url: String,

    /// Maximum number of pooled database connections
    pub database_max_connections: u32,

    /// Secret used to sign and verify bearer tokens
    pub jwt_secret: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .or_else(|| lookup("SECRET"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .context("JWT_SECRET (or SECRET) is required")?;

        Ok(Self {
            host: lookup("HOST"),

            port: lookup("PORT")
                .unwrap_or_else(|| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:./data/library.db".to_string()),

            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,

            jwt_secret,
        })
    }
}
