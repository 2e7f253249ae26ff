use std::fmt;
use std::time::Duration;
use url::Url;
use crate::{Error, Result};

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Lower bound for the pause between two extractions in one run.
pub const MIN_REQUEST_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub latest_path: String,
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            latest_path: "/articles/latest".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Clone)]
pub struct InferenceConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Budget for a whole completion call, response body included.
    pub timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Clone)]
pub struct RenderConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub navigation_timeout: Duration,
    pub selector_timeout: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            token: None,
            navigation_timeout: Duration::from_secs(30),
            selector_timeout: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_deref().map(|_| "<redacted>"))
            .field("navigation_timeout", &self.navigation_timeout)
            .field("selector_timeout", &self.selector_timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            user_agent: DESKTOP_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub discovery_limit: usize,
    pub request_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            discovery_limit: 2,
            request_delay: MIN_REQUEST_DELAY,
        }
    }
}

impl PipelineConfig {
    /// The configured delay, never shorter than [`MIN_REQUEST_DELAY`]
    pub fn effective_delay(&self) -> Duration {
        self.request_delay.max(MIN_REQUEST_DELAY)
    }
}

/// Runtime settings, built once at start-up and handed to each component.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub store: StoreConfig,
    pub inference: InferenceConfig,
    pub render: RenderConfig,
    pub fetch: FetchConfig,
    pub search: SearchConfig,
    pub pipeline: PipelineConfig,
}

impl Config {
    pub fn with_store_url(mut self, url: impl Into<String>) -> Self {
        self.store.base_url = url.into();
        self
    }

    pub fn with_latest_path(mut self, path: impl Into<String>) -> Self {
        self.store.latest_path = path.into();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.inference.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_inference_url(mut self, url: impl Into<String>) -> Self {
        self.inference.base_url = url.into();
        self
    }

    pub fn with_render(mut self, url: impl Into<String>, token: Option<String>) -> Self {
        self.render.base_url = url.into();
        self.render.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search.base_url = url.into();
        self
    }

    /// Checks every endpoint is an absolute HTTP(S) URL.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("store", &self.store.base_url),
            ("inference", &self.inference.base_url),
            ("render", &self.render.base_url),
            ("search", &self.search.base_url),
        ] {
            let url = Url::parse(value)
                .map_err(|e| Error::Config(format!("{} URL {:?} is invalid: {}", name, value, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::Config(format!("{} URL {:?} must use http or https", name, value)));
            }
        }
        if self.pipeline.discovery_limit == 0 {
            return Err(Error::Config("discovery limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pipeline.discovery_limit, 2);
        assert_eq!(config.render.navigation_timeout, Duration::from_secs(30));
        assert_eq!(config.fetch.timeout, Duration::from_secs(15));
        assert_eq!(config.inference.timeout, Duration::from_secs(120));
        assert_eq!(config.store.latest_path, "/articles/latest");
    }

    #[test]
    fn test_latest_path_override() {
        let config = Config::default().with_latest_path("/articles/latest/get");
        assert_eq!(config.store.latest_path, "/articles/latest/get");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let config = Config::default().with_store_url("not a url");
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = Config::default().with_search_url("ftp://example.com");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_delay_is_clamped() {
        let pipeline = PipelineConfig {
            request_delay: Duration::from_millis(100),
            ..Default::default()
        };
        assert_eq!(pipeline.effective_delay(), MIN_REQUEST_DELAY);

        let pipeline = PipelineConfig {
            request_delay: Duration::from_secs(3),
            ..Default::default()
        };
        assert_eq!(pipeline.effective_delay(), Duration::from_secs(3));
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let config = Config::default()
            .with_api_key(Some("sk-secret".to_string()))
            .with_render("http://localhost:3000", Some("tok".to_string()));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("\"tok\""));
    }

    #[test]
    fn test_blank_api_key_is_dropped() {
        let config = Config::default().with_api_key(Some("  ".to_string()));
        assert!(config.inference.api_key.is_none());
    }
}
