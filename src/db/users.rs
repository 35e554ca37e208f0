//! Users repository
//!
//! Passwords are not stored; see [crate::services::auth].

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::error::{StoreError, StoreResult, check_length, unique_violation};
use super::sqlite_helpers::{new_id, now_iso8601};

/// Minimum length of a username
pub const USERNAME_MIN_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub favorite_genre: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub favorite_genre: String,
}

type UserRow = (String, String, String, String);

fn row_to_record(r: UserRow) -> UserRecord {
    UserRecord {
        id: r.0,
        username: r.1,
        favorite_genre: r.2,
        created_at: r.3,
    }
}

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, user: CreateUser) -> StoreResult<UserRecord> {
        check_length("username", &user.username, USERNAME_MIN_LENGTH)?;
        if user.favorite_genre.is_empty() {
            return Err(StoreError::Required {
                field: "favoriteGenre",
            });
        }

        let record = UserRecord {
            id: new_id(),
            username: user.username,
            favorite_genre: user.favorite_genre,
            created_at: now_iso8601(),
        };

        sqlx::query(
            "INSERT INTO users (id, username, favorite_genre, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.username)
        .bind(&record.favorite_genre)
        .bind(&record.created_at)
        .execute(&self.pool)
        .await
        .map_err(unique_violation("username"))?;

        Ok(record)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, favorite_genre, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// Get user by exact username
    pub async fn get_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, favorite_genre, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }
}
