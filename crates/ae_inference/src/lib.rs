pub mod generator;
pub mod models;

pub use generator::ContentGenerator;
pub use models::create_model;

pub mod prelude {
    pub use super::generator::{ContentGenerator, MAX_OUTPUT_TOKENS, MODEL, TEMPERATURE};
    pub use super::models::create_model;
    pub use ae_core::{EnhancedArticle, ExtractedArticle, Result, Error, SourceArticle};
}
