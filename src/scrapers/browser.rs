use crate::config::BrowserConfig;
use crate::scrapers::traits::PageFetcher;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Page fetcher backed by a single headless Chrome tab
pub struct ChromeFetcher {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl ChromeFetcher {
    /// Launch Chrome and open the tab used for the whole run
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        info!("Launching Chrome (headless: {})...", config.headless);

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;

        Ok(Self {
            browser: Some(browser),
            tab,
        })
    }
}

#[async_trait]
impl PageFetcher for ChromeFetcher {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.tab
            .navigate_to(url)
            .with_context(|| format!("Failed to navigate to {}", url))?
            .wait_until_navigated()
            .with_context(|| format!("Navigation to {} did not complete", url))?;
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        let result = self
            .tab
            .evaluate("document.documentElement.outerHTML", false)
            .context("Failed to read page HTML")?;

        result
            .value
            .as_ref()
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Page HTML was empty"))
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        self.tab
            .find_element(selector)
            .with_context(|| format!("No element matches {}", selector))?
            .click()
            .with_context(|| format!("Could not click {}", selector))?;
        Ok(())
    }

    async fn wait_until_clickable(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .with_context(|| format!("{} did not appear within {:?}", selector, timeout))?
            .click()
            .with_context(|| format!("Could not click {}", selector))?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(browser) = self.browser.take() {
            info!("Closing Chrome...");
            if let Err(e) = self.tab.close(true) {
                debug!("Tab did not close cleanly: {:#}", e);
            }
            drop(browser);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "chrome"
    }
}
