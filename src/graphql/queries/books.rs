use super::prelude::*;

#[derive(Default)]
pub struct BookQueries;

#[Object]
impl BookQueries {
    /// Total number of books
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        catalog.book_count().await.map_err(|e| e.extend())
    }

    /// All books, optionally narrowed to one author (name or id) and/or one genre
    async fn all_books(
        &self,
        ctx: &Context<'_>,
        author: Option<String>,
        genre: Option<String>,
    ) -> Result<Vec<Book>> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        let books = catalog
            .all_books(&BookFilter { author, genre })
            .await
            .map_err(|e| e.extend())?;
        Ok(books.into_iter().map(Book::from).collect())
    }
}
