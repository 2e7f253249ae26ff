use async_trait::async_trait;
use ae_core::config::StoreConfig;
use ae_core::{
    ArticlePage, ArticleStore, ArticleUpdate, Error, PublishPayload, Result, SourceArticle,
    StoredArticle,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info};

/// `{success, data, message}` wrapper used by every store endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the persistence service's REST API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
    latest_path: String,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            latest_path: config.latest_path.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Unwraps the envelope, treating `success: false` like a non-2xx status.
    async fn read<T: DeserializeOwned>(action: &str, response: Response) -> Result<Option<T>> {
        let status = response.status();
        let body = response.text().await?;

        let envelope: Envelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(Error::Storage(format!("{}: malformed response: {}", action, e)));
            }
            Err(_) => {
                return Err(Error::Storage(format!(
                    "{} failed with status {}: {}",
                    action,
                    status,
                    body.trim()
                )));
            }
        };

        if !status.is_success() || !envelope.success {
            let detail = envelope
                .message
                .or(envelope.error)
                .unwrap_or_else(|| format!("status {}", status));
            return Err(Error::Storage(format!("{} failed: {}", action, detail)));
        }

        Ok(envelope.data)
    }

    async fn read_data<T: DeserializeOwned>(action: &str, response: Response) -> Result<T> {
        Self::read(action, response)
            .await?
            .ok_or_else(|| Error::Storage(format!("{}: response carried no data", action)))
    }

    async fn fetch_latest(&self) -> Result<SourceArticle> {
        let response = self.client.get(self.url(&self.latest_path)).send().await?;
        let article: StoredArticle = Self::read_data("fetch latest article", response).await?;
        Ok(article.into())
    }

    async fn post_article(&self, payload: &PublishPayload) -> Result<StoredArticle> {
        let response = self.client.post(self.url("articles")).json(payload).send().await?;
        Self::read_data("create article", response).await
    }
}

#[async_trait]
impl ArticleStore for HttpStore {
    async fn latest(&self) -> Result<SourceArticle> {
        info!("📚 Fetching latest article");
        let article = self.fetch_latest().await.map_err(|e| {
            error!("❌ Error fetching latest article: {}", e);
            e
        })?;
        info!("✨ Retrieved article: {}", article.title);
        Ok(article)
    }

    async fn create(&self, payload: &PublishPayload) -> Result<StoredArticle> {
        info!("💾 Creating article {:?}", payload.title);
        let stored = self.post_article(payload).await.map_err(|e| {
            error!("❌ Error creating article: {}", e);
            e
        })?;
        info!("✨ Article created with ID {}", stored.id);
        Ok(stored)
    }

    async fn get(&self, id: u64) -> Result<StoredArticle> {
        debug!("📖 Fetching article {}", id);
        let response = self.client.get(self.url(&format!("articles/{}", id))).send().await?;
        Self::read_data("fetch article", response).await
    }

    async fn list(&self, page: u32, per_page: u32) -> Result<ArticlePage> {
        debug!("📚 Listing articles (page {}, {} per page)", page, per_page);
        let response = self
            .client
            .get(self.url("articles"))
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await?;
        Self::read_data("list articles", response).await
    }

    async fn update(&self, id: u64, update: &ArticleUpdate) -> Result<StoredArticle> {
        debug!("📝 Updating article {}", id);
        let response = self
            .client
            .put(self.url(&format!("articles/{}", id)))
            .json(update)
            .send()
            .await?;
        Self::read_data("update article", response).await
    }

    async fn delete(&self, id: u64) -> Result<()> {
        debug!("🗑️ Deleting article {}", id);
        let response = self
            .client
            .delete(self.url(&format!("articles/{}", id)))
            .send()
            .await?;
        Self::read::<serde_json::Value>("delete article", response).await?;
        Ok(())
    }
}
