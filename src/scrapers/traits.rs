use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Page fetching capability used by both crawl phases
///
/// Implementations hold exactly one page at a time. Field lookups run on the
/// HTML returned by [`PageFetcher::content`]; interactions go through
/// `click`/`wait_until_clickable`. Every call may fail.
#[async_trait]
pub trait PageFetcher: Send {
    /// Load `url` and wait for it to finish navigating
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Rendered DOM of the current page
    async fn content(&mut self) -> Result<String>;

    /// Click the first element matching `selector`
    async fn click(&mut self, selector: &str) -> Result<()>;

    /// Wait up to `timeout` for `selector` to appear, then click it
    async fn wait_until_clickable(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    /// Release the underlying resource
    async fn close(&mut self) -> Result<()>;

    /// Name used in logs
    fn name(&self) -> &'static str;
}
