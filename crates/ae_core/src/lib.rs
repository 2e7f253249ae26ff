pub mod config;
pub mod error;
pub mod models;
pub mod scraping;
pub mod storage;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{CompletionRequest, InferenceModel};
pub use scraping::{ArticleExtractor, LinkDiscovery};
pub use storage::ArticleStore;
pub use types::{
    word_count, ArticlePage, ArticleUpdate, CandidateLink, EnhancedArticle, ExtractedArticle,
    PublishPayload, Reference, SourceArticle, StoredArticle,
};
