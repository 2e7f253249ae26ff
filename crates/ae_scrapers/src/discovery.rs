use std::collections::HashSet;
use std::sync::Arc;
use async_trait::async_trait;
use ae_core::{CandidateLink, Config, LinkDiscovery, Result};
use scraper::Html;
use tracing::{info, warn};
use url::Url;
use crate::fetch::{BrowserlessClient, PageFetcher, StaticFetcher};
use crate::selection::{element_text, parse_selector};

/// Hosts that never carry competitor articles.
pub const DENY_LIST: &[&str] = &["youtube.com", "facebook.com", "twitter.com", "google.com"];

const RESULTS_READY: &str = "div#search";
const RESULT_BLOCK: &str = "div.g";
const RESULT_LINK: &str = "a[href]";
const RESULT_TITLE: &str = "h3";
const RESULT_SNIPPET: &str = ".VwiC3b, .yXK7lf";

/// Finds competing articles by scraping a search-results page.
pub struct DiscoveryService {
    tiers: Vec<Arc<dyn PageFetcher>>,
    search_base: Url,
}

impl DiscoveryService {
    pub fn new(tiers: Vec<Arc<dyn PageFetcher>>, search_base: &str) -> Result<Self> {
        Ok(Self {
            tiers,
            search_base: Url::parse(search_base)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            vec![
                Arc::new(BrowserlessClient::new(&config.render, &config.fetch.user_agent)),
                Arc::new(StaticFetcher::new(&config.fetch)?),
            ],
            &config.search.base_url,
        )
    }

    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.search_base.join("/search").unwrap_or_else(|_| self.search_base.clone());
        url.query_pairs_mut().clear().append_pair("q", query);
        url
    }

    /// Reads result blocks in page order, keeping at most `limit` allowed,
    /// distinct links.
    pub fn parse_results(&self, html: &str, limit: usize) -> Result<Vec<CandidateLink>> {
        let document = Html::parse_document(html);
        let block_selector = parse_selector(RESULT_BLOCK)?;
        let link_selector = parse_selector(RESULT_LINK)?;
        let title_selector = parse_selector(RESULT_TITLE)?;
        let snippet_selector = parse_selector(RESULT_SNIPPET)?;

        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for block in document.select(&block_selector) {
            if results.len() >= limit {
                break;
            }

            let Some(href) = block
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
            else {
                continue;
            };
            let title = match block.select(&title_selector).next() {
                Some(h3) => element_text(&h3).trim().to_string(),
                None => continue,
            };
            if title.is_empty() {
                continue;
            }

            let Some(url) = self.resolve_href(href) else {
                continue;
            };
            if is_denied(&url) || !seen.insert(dedup_key(&url)) {
                continue;
            }

            let snippet = block
                .select(&snippet_selector)
                .next()
                .map(|el| element_text(&el).trim().to_string())
                .unwrap_or_default();

            results.push(CandidateLink {
                url: url.to_string(),
                title,
                snippet,
            });
        }

        Ok(results)
    }

    /// Absolute HTTP(S) target of a result link, unwrapping the search
    /// provider's own `/url?q=` redirects.
    fn resolve_href(&self, href: &str) -> Option<Url> {
        let url = self.search_base.join(href).ok()?;
        let url = if url.path() == "/url" && url.host_str() == self.search_base.host_str() {
            let target = url
                .query_pairs()
                .find(|(key, _)| key == "q" || key == "url")
                .map(|(_, value)| value.into_owned())?;
            Url::parse(&target).ok()?
        } else {
            url
        };
        matches!(url.scheme(), "http" | "https").then_some(url)
    }
}

pub fn is_denied(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return true;
    };
    let host = host.to_ascii_lowercase();
    DENY_LIST
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

/// Normalized host and path, so `www.` and trailing-slash variants collapse.
pub fn dedup_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    format!("{}{}", host, url.path().trim_end_matches('/'))
}

#[async_trait]
impl LinkDiscovery for DiscoveryService {
    async fn discover(&self, query: &str, limit: usize) -> Vec<CandidateLink> {
        if limit == 0 {
            return Vec::new();
        }

        let search_url = self.search_url(query);
        info!("🔍 Searching for {:?}", query);

        for tier in &self.tiers {
            let html = match tier.fetch_html(search_url.as_str(), RESULTS_READY).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("⚠️ {} tier search failed: {}", tier.tier(), e);
                    continue;
                }
            };
            match self.parse_results(&html, limit) {
                Ok(results) => {
                    info!("✨ Found {} search results ({} tier)", results.len(), tier.tier());
                    return results;
                }
                Err(e) => warn!("⚠️ Could not read {} tier results: {}", tier.tier(), e),
            }
        }

        warn!("⚠️ All search tiers failed for {:?}", query);
        Vec::new()
    }
}
