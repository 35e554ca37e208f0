//! Authors repository

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::error::{StoreResult, check_length, unique_violation};
use super::sqlite_helpers::{new_id, now_iso8601};

/// Minimum length of an author's name
pub const NAME_MIN_LENGTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub id: String,
    pub name: String,
    pub born: Option<i32>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateAuthor {
    pub name: String,
    pub born: Option<i32>,
}

type AuthorRow = (String, String, Option<i32>, String);

fn row_to_record(r: AuthorRow) -> AuthorRecord {
    AuthorRecord {
        id: r.0,
        name: r.1,
        born: r.2,
        created_at: r.3,
    }
}

pub struct AuthorRepository {
    pool: SqlitePool,
}

impl AuthorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Total number of authors
    pub async fn count(&self) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// List all authors in insertion order
    pub async fn list_all(&self) -> StoreResult<Vec<AuthorRecord>> {
        let rows = sqlx::query_as::<_, AuthorRow>(
            "SELECT id, name, born, created_at FROM authors ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<AuthorRecord>> {
        let row = sqlx::query_as::<_, AuthorRow>(
            "SELECT id, name, born, created_at FROM authors WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// Get author by exact name
    pub async fn get_by_name(&self, name: &str) -> StoreResult<Option<AuthorRecord>> {
        let row = sqlx::query_as::<_, AuthorRow>(
            "SELECT id, name, born, created_at FROM authors WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// Create a new author
    pub async fn create(&self, author: CreateAuthor) -> StoreResult<AuthorRecord> {
        check_length("name", &author.name, NAME_MIN_LENGTH)?;

        let record = AuthorRecord {
            id: new_id(),
            name: author.name,
            born: author.born,
            created_at: now_iso8601(),
        };

        sqlx::query("INSERT INTO authors (id, name, born, created_at) VALUES (?, ?, ?, ?)")
            .bind(&record.id)
            .bind(&record.name)
            .bind(record.born)
            .bind(&record.created_at)
            .execute(&self.pool)
            .await
            .map_err(unique_violation("name"))?;

        Ok(record)
    }

    /// Set an author's birth year. Returns the updated author, or None if the id is unknown.
    pub async fn set_born(&self, id: &str, born: i32) -> StoreResult<Option<AuthorRecord>> {
        let result = sqlx::query("UPDATE authors SET born = ? WHERE id = ?")
            .bind(born)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }
}
