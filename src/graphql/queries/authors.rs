use super::prelude::*;

#[derive(Default)]
pub struct AuthorQueries;

#[Object]
impl AuthorQueries {
    /// Total number of authors
    async fn author_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        catalog.author_count().await.map_err(|e| e.extend())
    }

    async fn all_authors(&self, ctx: &Context<'_>) -> Result<Vec<Author>> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        let authors = catalog.all_authors().await.map_err(|e| e.extend())?;
        Ok(authors.into_iter().map(Author::from).collect())
    }
}
