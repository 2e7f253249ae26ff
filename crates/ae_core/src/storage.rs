use async_trait::async_trait;
use crate::types::{ArticlePage, ArticleUpdate, PublishPayload, SourceArticle, StoredArticle};
use crate::Result;

/// CRUD surface of the content store.
///
/// Every method fails with [`crate::Error::Storage`] when the store answers
/// `success: false`, and with the transport error when it cannot be reached.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Fetch the most recently created article
    async fn latest(&self) -> Result<SourceArticle>;

    /// Create a new article
    async fn create(&self, payload: &PublishPayload) -> Result<StoredArticle>;

    async fn get(&self, id: u64) -> Result<StoredArticle>;

    async fn list(&self, page: u32, per_page: u32) -> Result<ArticlePage>;

    async fn update(&self, id: u64, update: &ArticleUpdate) -> Result<StoredArticle>;

    async fn delete(&self, id: u64) -> Result<()>;
}
