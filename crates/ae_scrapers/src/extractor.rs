use std::sync::Arc;
use async_trait::async_trait;
use ae_core::{ArticleExtractor, Config, Error, ExtractedArticle, Result};
use tracing::{info, warn};
use url::Url;
use crate::fetch::{BrowserlessClient, PageFetcher, StaticFetcher};
use crate::selection::select_article;

const BODY_SELECTOR: &str = "body";

/// Pulls article text out of arbitrary pages, trying each tier in order.
pub struct ExtractionEngine {
    tiers: Vec<Arc<dyn PageFetcher>>,
}

impl ExtractionEngine {
    pub fn new(tiers: Vec<Arc<dyn PageFetcher>>) -> Self {
        Self { tiers }
    }

    /// Dynamic render first, static fetch as the fallback.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(vec![
            Arc::new(BrowserlessClient::new(&config.render, &config.fetch.user_agent)),
            Arc::new(StaticFetcher::new(&config.fetch)?),
        ]))
    }

    /// Runs a single tier. An empty selection counts as a failure so the
    /// caller can move on to the next tier.
    pub async fn extract_with(tier: &dyn PageFetcher, url: &str) -> Result<ExtractedArticle> {
        let html = tier.fetch_html(url, BODY_SELECTOR).await?;
        let selection = select_article(&html)?;
        if selection.content.is_empty() {
            return Err(Error::Scraping(format!("no readable content found at {}", url)));
        }
        Ok(ExtractedArticle::new(url, selection.title, selection.content))
    }
}

fn check_url(url: &str) -> Result<()> {
    let parsed = Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::InvalidUrl(format!("unsupported scheme {:?} in {}", other, url))),
    }
}

#[async_trait]
impl ArticleExtractor for ExtractionEngine {
    async fn extract(&self, url: &str) -> ExtractedArticle {
        info!("🦗 Scraping article from {}", url);

        if let Err(e) = check_url(url) {
            warn!("⚠️ Skipping {}: {}", url, e);
            return ExtractedArticle::failed(url, e.to_string());
        }

        let mut last_error = String::from("no extraction tiers configured");
        for tier in &self.tiers {
            match Self::extract_with(tier.as_ref(), url).await {
                Ok(article) => {
                    info!(
                        "✨ Extracted {} words from {} ({} tier)",
                        article.word_count,
                        url,
                        tier.tier()
                    );
                    return article;
                }
                Err(e) => {
                    warn!("⚠️ {} tier failed for {}: {}", tier.tier(), url, e);
                    last_error = e.to_string();
                }
            }
        }

        ExtractedArticle::failed(url, last_error)
    }
}
