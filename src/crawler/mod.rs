//! Two-phase checkpointed crawl.
//!
//! Discovery fills the *discovered* store with recent listing URLs, extraction
//! turns each into a [`ListingRecord`] in the *completed* store, and the
//! driver removes the consumed discovered file at the end. The two store
//! files are the only state shared between runs: a non-empty discovered
//! store on startup resumes extraction instead of discovering again.

pub mod discovery;
pub mod extraction;

pub use discovery::{discover, DiscoveryOutcome};
pub use extraction::{extract_all, ExtractionSummary};

use crate::config::{validate, Config, ConfigResult};
use crate::models::{Candidate, ListingRecord};
use crate::scrapers::{PageFetcher, PageSelectors, PricePattern};
use crate::store::CheckpointStore;
use anyhow::Result;
use tracing::{info, warn};

/// Configuration with selectors and price pattern compiled
#[derive(Debug, Clone)]
pub struct CrawlPlan {
    pub config: Config,
    pub selectors: PageSelectors,
    pub prices: PricePattern,
}

impl CrawlPlan {
    pub fn new(config: Config) -> ConfigResult<Self> {
        validate(&config)?;
        let selectors = PageSelectors::compile(&config.selectors)?;
        let prices = PricePattern::new(&config.search.currency_symbol);
        Ok(Self {
            config,
            selectors,
            prices,
        })
    }
}

/// Everything one crawl run works with
pub struct CrawlContext {
    pub fetcher: Box<dyn PageFetcher>,
    pub discovered: CheckpointStore<Candidate>,
    pub completed: CheckpointStore<ListingRecord>,
    pub plan: CrawlPlan,
}

/// Result of a full run
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    pub discovery: DiscoveryOutcome,
    pub extraction: ExtractionSummary,
    pub completed_total: usize,
}

/// Owns the crawl context and runs the phases in order
pub struct Crawler {
    ctx: CrawlContext,
}

impl Crawler {
    /// Opens both stores; missing or corrupt files start out empty.
    pub fn new(config: Config, fetcher: Box<dyn PageFetcher>) -> ConfigResult<Self> {
        let plan = CrawlPlan::new(config)?;
        let discovered = CheckpointStore::open(&plan.config.storage.discovered_path);
        let completed = CheckpointStore::open(&plan.config.storage.completed_path);

        Ok(Self {
            ctx: CrawlContext {
                fetcher,
                discovered,
                completed,
                plan,
            },
        })
    }

    /// Discovery, then extraction, then cleanup of the discovered file.
    pub async fn run(self) -> Result<CrawlReport> {
        let CrawlContext {
            mut fetcher,
            mut discovered,
            mut completed,
            plan,
        } = self.ctx;

        info!(
            "Using {} fetcher; {} listings already completed",
            fetcher.name(),
            completed.len()
        );

        let discovery = discover(fetcher.as_mut(), &mut discovered, &plan).await;

        let candidates: Vec<Candidate> = discovered
            .records()
            .into_iter()
            .map(|(_, candidate)| candidate)
            .collect();
        let extraction = extract_all(&candidates, fetcher.as_mut(), &mut completed, &plan).await;

        if let Err(e) = fetcher.close().await {
            warn!("Failed to release {} fetcher: {:#}", fetcher.name(), e);
        }

        let discovered_path = discovered.path().to_path_buf();
        match discovered.remove() {
            Ok(()) => info!("{} deleted since it's not needed anymore", discovered_path.display()),
            Err(e) => warn!("Could not delete {}: {}", discovered_path.display(), e),
        }

        Ok(CrawlReport {
            discovery,
            extraction,
            completed_total: completed.len(),
        })
    }
}
