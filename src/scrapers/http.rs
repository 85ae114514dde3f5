use crate::config::BrowserConfig;
use crate::scrapers::traits::PageFetcher;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Page fetcher that downloads raw HTML without rendering it
///
/// Pages that need scripts to render will come back incomplete, and there is
/// nothing to click: carousels stop at their first slide and cookie overlays
/// are never dismissed.
pub struct HttpFetcher {
    client: Client,
    page: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, page: None })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.page = None;
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            warn!("{} returned status: {}", url, response.status());
            bail!("Failed to fetch {}: {}", url, response.status());
        }

        let html = response.text().await.context("Failed to read response body")?;
        debug!("Downloaded {} bytes of HTML", html.len());
        self.page = Some(html);
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        match &self.page {
            Some(html) => Ok(html.clone()),
            None => bail!("No page loaded"),
        }
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        bail!("Cannot click {} without a browser", selector)
    }

    async fn wait_until_clickable(&mut self, selector: &str, _timeout: Duration) -> Result<()> {
        bail!("Cannot click {} without a browser", selector)
    }

    async fn close(&mut self) -> Result<()> {
        self.page = None;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
