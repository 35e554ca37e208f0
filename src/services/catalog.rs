//! Catalog service: books and authors
//!
//! Every protected operation takes the acting user explicitly; `None` means the
//! request carried no valid credentials.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::{AuthorRecord, BookRecord, CreateAuthor, CreateBook, Database, StoreError};
use crate::error::{CatalogError, CatalogResult};
use crate::services::auth::CurrentUser;

/// Arguments of `addBook`
#[derive(Debug, Clone, Serialize)]
pub struct AddBookArgs {
    pub title: String,
    pub author: String,
    pub published: i32,
    pub genres: Vec<String>,
}

/// Arguments of `editAuthor`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditAuthorArgs {
    pub name: String,
    pub set_born_to: i32,
}

/// Optional filters of `allBooks`. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Author name or id
    pub author: Option<String>,
    pub genre: Option<String>,
}

impl BookFilter {
    fn matches(&self, book: &BookWithAuthor) -> bool {
        let author_ok = self
            .author
            .as_deref()
            .filter(|a| !a.is_empty())
            .is_none_or(|a| book.author.name == a || book.author.id == a);
        let genre_ok = self
            .genre
            .as_deref()
            .filter(|g| !g.is_empty())
            .is_none_or(|g| book.book.genres.iter().any(|bg| bg == g));
        author_ok && genre_ok
    }
}

/// A book with its author populated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookWithAuthor {
    pub book: BookRecord,
    pub author: AuthorRecord,
}

#[derive(Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn book_count(&self) -> CatalogResult<i64> {
        Ok(self.db.books().count().await?)
    }

    pub async fn author_count(&self) -> CatalogResult<i64> {
        Ok(self.db.authors().count().await?)
    }

    pub async fn all_authors(&self) -> CatalogResult<Vec<AuthorRecord>> {
        Ok(self.db.authors().list_all().await?)
    }

    /// Number of books referencing the author
    pub async fn author_book_count(&self, author_id: &str) -> CatalogResult<i64> {
        Ok(self.db.books().count_by_author(author_id).await?)
    }

    /// All books with authors populated, narrowed by the filter
    pub async fn all_books(&self, filter: &BookFilter) -> CatalogResult<Vec<BookWithAuthor>> {
        let authors: HashMap<String, AuthorRecord> = self
            .db
            .authors()
            .list_all()
            .await?
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect();

        let books = self.db.books().list_all().await?;
        let mut result = Vec::with_capacity(books.len());
        for book in books {
            let Some(author) = authors.get(&book.author_id) else {
                warn!(book_id = %book.id, author_id = %book.author_id, "Book references a missing author");
                continue;
            };
            let populated = BookWithAuthor {
                author: author.clone(),
                book,
            };
            if filter.matches(&populated) {
                result.push(populated);
            }
        }

        Ok(result)
    }

    /// Add a book, creating its author on demand
    pub async fn add_book(
        &self,
        actor: Option<&CurrentUser>,
        args: AddBookArgs,
    ) -> CatalogResult<BookWithAuthor> {
        let actor = actor.ok_or_else(CatalogError::not_authenticated)?;

        let author = match self.db.authors().get_by_name(&args.author).await? {
            Some(author) => author,
            None => self.create_author(&args).await?,
        };

        let book = self
            .db
            .books()
            .create(CreateBook {
                title: args.title.clone(),
                published: args.published,
                author_id: author.id.clone(),
                genres: args.genres.clone(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate { .. } => CatalogError::user_input(
                    format!("Title \"{}\" is already in library", args.title),
                    &args,
                ),
                StoreError::TooShort { .. } => CatalogError::user_input(
                    format!("Title \"{}\" is too short", args.title),
                    &args,
                ),
                StoreError::Required { .. } => {
                    CatalogError::user_input("Title cannot be empty", &args)
                }
                other => other.into(),
            })?;

        info!(
            book_id = %book.id,
            title = %book.title,
            author = %author.name,
            user = %actor.0.username,
            "Book added"
        );
        Ok(BookWithAuthor { book, author })
    }

    async fn create_author(&self, args: &AddBookArgs) -> CatalogResult<AuthorRecord> {
        let created = self
            .db
            .authors()
            .create(CreateAuthor {
                name: args.author.clone(),
                born: None,
            })
            .await;

        match created {
            Ok(author) => {
                info!(author_id = %author.id, name = %author.name, "Author created");
                Ok(author)
            }
            Err(StoreError::Required { .. }) => {
                Err(CatalogError::user_input("Author cannot be empty", args))
            }
            Err(StoreError::TooShort { .. }) => Err(CatalogError::user_input(
                format!("Author's name \"{}\" is too short", args.author),
                args,
            )),
            Err(StoreError::Duplicate { .. }) => {
                // Another request created the author between lookup and insert.
                debug!(name = %args.author, "Author created concurrently, re-reading");
                self.db
                    .authors()
                    .get_by_name(&args.author)
                    .await?
                    .ok_or_else(|| StoreError::Duplicate { field: "name" }.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Set an author's birth year. Unknown names yield `None` and change nothing.
    pub async fn edit_author(
        &self,
        actor: Option<&CurrentUser>,
        args: EditAuthorArgs,
    ) -> CatalogResult<Option<AuthorRecord>> {
        actor.ok_or_else(CatalogError::not_authenticated)?;

        let Some(author) = self.db.authors().get_by_name(&args.name).await? else {
            debug!(name = %args.name, "editAuthor: no such author");
            return Ok(None);
        };

        let updated = self
            .db
            .authors()
            .set_born(&author.id, args.set_born_to)
            .await
            .map_err(|e| CatalogError::user_input(e.to_string(), &args))?;

        if let Some(author) = &updated {
            info!(author_id = %author.id, born = args.set_born_to, "Author birth year updated");
        }
        Ok(updated)
    }
}
