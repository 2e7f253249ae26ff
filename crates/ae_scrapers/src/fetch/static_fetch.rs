use async_trait::async_trait;
use ae_core::config::FetchConfig;
use ae_core::{Error, Result};
use reqwest::Client;
use tracing::debug;
use super::PageFetcher;

/// Plain HTTP GET. Fast, but blind to client-rendered content.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    client: Client,
}

impl StaticFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    fn tier(&self) -> &str {
        "static"
    }

    async fn fetch_html(&self, url: &str, _wait_for: &str) -> Result<String> {
        debug!("📥 GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Scraping(format!("GET {} returned {}", url, status)));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::Router;

    async fn spawn_site() -> String {
        let app = Router::new()
            .route(
                "/ua",
                get(|headers: HeaderMap| async move {
                    headers
                        .get("user-agent")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string()
                }),
            )
            .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "nope") }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_sends_configured_user_agent() {
        let base = spawn_site().await;
        let config = FetchConfig {
            user_agent: "desktop-agent".to_string(),
            ..Default::default()
        };
        let fetcher = StaticFetcher::new(&config).unwrap();
        let body = fetcher.fetch_html(&format!("{}/ua", base), "body").await.unwrap();
        assert_eq!(body, "desktop-agent");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let base = spawn_site().await;
        let fetcher = StaticFetcher::new(&FetchConfig::default()).unwrap();
        let err = fetcher
            .fetch_html(&format!("{}/missing", base), "body")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
