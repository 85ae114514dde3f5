use crate::config::BrowserConfig;
use crate::scrapers::browser::ChromeFetcher;
use crate::scrapers::http::HttpFetcher;
use crate::scrapers::traits::PageFetcher;
use anyhow::Result;
use clap::ValueEnum;

/// Available page fetcher backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FetcherKind {
    /// Rendered pages through headless Chrome
    #[default]
    Chrome,
    /// Raw HTML over plain HTTP
    Http,
}

impl FetcherKind {
    /// Build the fetcher this kind names
    pub fn build(self, config: &BrowserConfig) -> Result<Box<dyn PageFetcher>> {
        Ok(match self {
            FetcherKind::Chrome => Box::new(ChromeFetcher::new(config)?),
            FetcherKind::Http => Box::new(HttpFetcher::new(config)?),
        })
    }
}
