use super::prelude::*;

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    /// Add a book. The author is created if it does not exist yet.
    ///
    /// Requires authentication.
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        author: String,
        published: i32,
        genres: Vec<String>,
    ) -> Result<Book> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        let args = AddBookArgs {
            title,
            author,
            published,
            genres,
        };

        let book = catalog
            .add_book(ctx.current_user(), args)
            .await
            .map_err(|e| e.extend())?;
        Ok(book.into())
    }
}
