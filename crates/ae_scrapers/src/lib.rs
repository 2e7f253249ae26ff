pub mod discovery;
pub mod extractor;
pub mod fetch;
pub mod selection;

pub use discovery::DiscoveryService;
pub use extractor::ExtractionEngine;
pub use fetch::{BrowserlessClient, PageFetcher, StaticFetcher};

pub mod prelude {
    pub use super::{DiscoveryService, ExtractionEngine};
    pub use ae_core::{ArticleExtractor, CandidateLink, ExtractedArticle, LinkDiscovery, Result, Error};
}
