use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use ae_core::config::RenderConfig;
use ae_core::{Error, Result};
use serde::Serialize;
use tracing::debug;
use url::Url;
use super::PageFetcher;

const LAUNCH_ARGS: &[&str] = &["--no-sandbox", "--disable-setuid-sandbox"];
const WAIT_UNTIL: &str = "networkidle2";
/// Slack on top of the navigation and selector budgets for the HTTP round trip.
const TRANSPORT_SLACK: Duration = Duration::from_secs(5);

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    user_agent: &'a str,
    goto_options: GotoOptions,
    wait_for_selector: WaitForSelector<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: &'static str,
    timeout: u64,
}

#[derive(Serialize)]
struct WaitForSelector<'a> {
    selector: &'a str,
    timeout: u64,
}

#[derive(Serialize)]
struct LaunchOptions {
    headless: bool,
    args: &'static [&'static str],
}

/// Client for a Browserless-compatible `/content` endpoint.
///
/// Each call runs inside its own [`RenderSession`], so no browser, cookie or
/// connection outlives the call that created it.
pub struct BrowserlessClient {
    base_url: String,
    token: Option<String>,
    user_agent: String,
    navigation_timeout: Duration,
    selector_timeout: Duration,
    live_sessions: Arc<AtomicUsize>,
}

impl BrowserlessClient {
    pub fn new(config: &RenderConfig, user_agent: &str) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            user_agent: user_agent.to_string(),
            navigation_timeout: config.navigation_timeout,
            selector_timeout: config.selector_timeout,
            live_sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sessions currently open against the backend
    pub fn live_sessions(&self) -> usize {
        self.live_sessions.load(Ordering::SeqCst)
    }

    fn endpoint(&self) -> Result<Url> {
        let mut endpoint = Url::parse(&format!("{}/content", self.base_url))?;
        let launch = serde_json::to_string(&LaunchOptions {
            headless: true,
            args: LAUNCH_ARGS,
        })?;
        {
            let mut query = endpoint.query_pairs_mut();
            if let Some(ref token) = self.token {
                query.append_pair("token", token);
            }
            query.append_pair("launch", &launch);
        }
        Ok(endpoint)
    }

    /// Opens a fresh, isolated session. Dropping it releases the remote browser.
    pub fn open_session(&self) -> Result<RenderSession> {
        let http = reqwest::Client::builder()
            .timeout(self.navigation_timeout + self.selector_timeout + TRANSPORT_SLACK)
            .pool_max_idle_per_host(0)
            .build()?;
        let id = NEXT_SESSION.fetch_add(1, Ordering::Relaxed);
        self.live_sessions.fetch_add(1, Ordering::SeqCst);
        debug!("🌐 Render session {} opened", id);
        Ok(RenderSession {
            id,
            http,
            live_sessions: self.live_sessions.clone(),
        })
    }

    /// Fetch fully-rendered HTML for a URL once `wait_for` is present in the page.
    pub async fn content(&self, url: &str, wait_for: &str) -> Result<String> {
        let endpoint = self.endpoint()?;
        let body = ContentRequest {
            url,
            user_agent: &self.user_agent,
            goto_options: GotoOptions {
                wait_until: WAIT_UNTIL,
                timeout: self.navigation_timeout.as_millis() as u64,
            },
            wait_for_selector: WaitForSelector {
                selector: wait_for,
                timeout: self.selector_timeout.as_millis() as u64,
            },
        };

        let session = self.open_session()?;
        session.render(endpoint, &body).await
    }
}

/// A single-use browsing context on the render backend.
pub struct RenderSession {
    id: u64,
    http: reqwest::Client,
    live_sessions: Arc<AtomicUsize>,
}

impl RenderSession {
    pub fn id(&self) -> u64 {
        self.id
    }

    async fn render(&self, endpoint: Url, body: &ContentRequest<'_>) -> Result<String> {
        let resp = self
            .http
            .post(endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Render(format!("request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Render(format!(
                "backend returned {}: {}",
                status.as_u16(),
                message.trim()
            )));
        }

        resp.text()
            .await
            .map_err(|e| Error::Render(format!("failed to read rendered page: {}", e)))
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.live_sessions.fetch_sub(1, Ordering::SeqCst);
        debug!("🧹 Render session {} closed", self.id);
    }
}

#[async_trait]
impl PageFetcher for BrowserlessClient {
    fn tier(&self) -> &str {
        "render"
    }

    async fn fetch_html(&self, url: &str, wait_for: &str) -> Result<String> {
        self.content(url, wait_for).await
    }
}
