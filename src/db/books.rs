//! Books repository

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::error::{StoreResult, check_length, unique_violation};
use super::sqlite_helpers::{json_to_vec, new_id, now_iso8601, vec_to_json};

/// Minimum length of a book title
pub const TITLE_MIN_LENGTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub published: i32,
    pub author_id: String,
    pub genres: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub published: i32,
    pub author_id: String,
    pub genres: Vec<String>,
}

type BookRow = (String, String, i32, String, String, String);

fn row_to_record(r: BookRow) -> BookRecord {
    BookRecord {
        id: r.0,
        title: r.1,
        published: r.2,
        author_id: r.3,
        genres: json_to_vec(&r.4),
        created_at: r.5,
    }
}

pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Total number of books
    pub async fn count(&self) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of books written by one author
    pub async fn count_by_author(&self, author_id: &str) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// List all books in insertion order
    pub async fn list_all(&self) -> StoreResult<Vec<BookRecord>> {
        let rows = sqlx::query_as::<_, BookRow>(
            "SELECT id, title, published, author_id, genres, created_at FROM books ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// Create a new book. The referenced author must exist.
    pub async fn create(&self, book: CreateBook) -> StoreResult<BookRecord> {
        check_length("title", &book.title, TITLE_MIN_LENGTH)?;

        let record = BookRecord {
            id: new_id(),
            title: book.title,
            published: book.published,
            author_id: book.author_id,
            genres: book.genres,
            created_at: now_iso8601(),
        };

        sqlx::query(
            r#"
            INSERT INTO books (id, title, published, author_id, genres, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.title)
        .bind(record.published)
        .bind(&record.author_id)
        .bind(vec_to_json(&record.genres))
        .bind(&record.created_at)
        .execute(&self.pool)
        .await
        .map_err(unique_violation("title"))?;

        Ok(record)
    }
}
