use async_trait::async_trait;
use ae_core::Result;

pub mod render;
pub mod static_fetch;

pub use render::{BrowserlessClient, RenderSession};
pub use static_fetch::StaticFetcher;

/// One way of turning a URL into HTML. Extraction and discovery try a list
/// of these in order and keep the first success.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Short tier name used in logs
    fn tier(&self) -> &str;

    /// Fetches the page markup. `wait_for` is a CSS selector the page must
    /// contain before it is considered ready; tiers that cannot wait ignore it.
    async fn fetch_html(&self, url: &str, wait_for: &str) -> Result<String>;
}
