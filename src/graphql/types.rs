//! GraphQL object types

use std::sync::Arc;

use async_graphql::{ComplexObject, Context, ErrorExtensions, ID, Result, SimpleObject};

use crate::db::{AuthorRecord, UserRecord};
use crate::services::{BookWithAuthor, CatalogService};

/// A book author. `bookCount` is computed on demand.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Author {
    pub name: String,
    pub born: Option<i32>,
    pub id: ID,
}

#[ComplexObject]
impl Author {
    /// Number of books in the library written by this author
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        catalog
            .author_book_count(&self.id)
            .await
            .map_err(|e| e.extend())
    }
}

impl From<AuthorRecord> for Author {
    fn from(r: AuthorRecord) -> Self {
        Self {
            name: r.name,
            born: r.born,
            id: ID(r.id),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Book {
    pub title: String,
    pub published: i32,
    pub author: Author,
    pub genres: Vec<String>,
    pub id: ID,
}

impl From<BookWithAuthor> for Book {
    fn from(b: BookWithAuthor) -> Self {
        Self {
            title: b.book.title,
            published: b.book.published,
            author: b.author.into(),
            genres: b.book.genres,
            id: ID(b.book.id),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    pub username: String,
    pub favorite_genre: String,
    pub id: ID,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            username: r.username,
            favorite_genre: r.favorite_genre,
            id: ID(r.id),
        }
    }
}

/// A signed bearer token
#[derive(Debug, Clone, SimpleObject)]
pub struct Token {
    pub value: String,
}
