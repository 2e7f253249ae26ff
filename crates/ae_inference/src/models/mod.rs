use std::sync::Arc;
use ae_core::config::InferenceConfig;
use ae_core::{Error, InferenceModel, Result};

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

/// Builds the named backend: `openai` (default) or `dummy`.
pub fn create_model(name: &str, config: &InferenceConfig) -> Result<Arc<dyn InferenceModel>> {
    match name.to_lowercase().as_str() {
        "openai" => Ok(Arc::new(OpenAiModel::new(config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Config(format!(
            "Unknown inference model: {}. Available models: openai, dummy",
            other
        ))),
    }
}
