use async_trait::async_trait;
use crate::types::{CandidateLink, ExtractedArticle};

/// Turns a URL into readable article text. Never fails: problems are
/// reported through [`ExtractedArticle::error`].
#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> ExtractedArticle;
}

/// Finds competing articles for a topic. Never fails: returns an empty list
/// when every strategy is exhausted.
#[async_trait]
pub trait LinkDiscovery: Send + Sync {
    async fn discover(&self, query: &str, limit: usize) -> Vec<CandidateLink>;
}
