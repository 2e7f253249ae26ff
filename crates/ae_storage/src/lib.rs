use std::sync::Arc;
use ae_core::config::StoreConfig;
use ae_core::{ArticleStore, Error, Result};

pub mod backends;

pub use backends::*;

/// Builds the named store backend: `http` (default) or `memory`.
pub fn create_store(name: &str, config: &StoreConfig) -> Result<Arc<dyn ArticleStore>> {
    match name.to_lowercase().as_str() {
        "http" => Ok(Arc::new(HttpStore::new(config)?)),
        "memory" => Ok(Arc::new(MemoryStore::new())),
        other => Err(Error::Config(format!(
            "Unknown storage backend: {}. Available backends: http, memory",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::create_store;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_store_by_name() {
        let config = StoreConfig::default();
        assert!(create_store("http", &config).is_ok());
        assert!(create_store("Memory", &config).is_ok());
        assert!(matches!(create_store("qdrant", &config), Err(Error::Config(_))));
    }
}
