use crate::crawler::CrawlPlan;
use crate::geo::extract_coordinates;
use crate::models::{Candidate, ListingRecord, Location};
use crate::scrapers::page::{carousel_sources, parse_listing};
use crate::scrapers::PageFetcher;
use crate::store::CheckpointStore;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Counts from one extraction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub extracted: usize,
    pub duplicates: usize,
    pub failed: usize,
}

/// Extracts every candidate not yet in `completed`.
///
/// The completed store is saved after each new record, so an interruption
/// loses at most the listing in flight.
#[instrument(skip_all, fields(phase = "extraction", candidates = candidates.len()))]
pub async fn extract_all(
    candidates: &[Candidate],
    fetcher: &mut dyn PageFetcher,
    completed: &mut CheckpointStore<ListingRecord>,
    plan: &CrawlPlan,
) -> ExtractionSummary {
    let mut seen: HashSet<String> = completed.links().map(str::to_string).collect();
    let mut summary = ExtractionSummary::default();
    let pause = Duration::from_millis(plan.config.pacing.listing_delay_ms);

    for candidate in candidates {
        if seen.contains(&candidate.url) {
            info!("Skipping {}, already processed.", candidate.url);
            summary.duplicates += 1;
            continue;
        }

        match extract_listing(fetcher, candidate, plan).await {
            Ok(Some(record)) => {
                let link = record.link.clone();
                match completed.append(&record) {
                    Ok(key) => {
                        seen.insert(link);
                        summary.extracted += 1;
                        if let Err(e) = completed.save() {
                            error!(
                                url = %candidate.url,
                                "Failed to save completed listings: {}", e
                            );
                        }
                        info!("Saved {} as {}", candidate.url, key);
                    }
                    Err(e) => {
                        error!(url = %candidate.url, "Could not store listing: {}", e);
                        summary.failed += 1;
                    }
                }
            }
            Ok(None) => {
                warn!(url = %candidate.url, "Title not found, skipping.");
                summary.failed += 1;
            }
            Err(e) => {
                warn!(url = %candidate.url, "Listing skipped: {:#}", e);
                summary.failed += 1;
            }
        }

        tokio::time::sleep(pause).await;
    }

    info!(
        "Extracted {} listings ({} already processed, {} failed)",
        summary.extracted, summary.duplicates, summary.failed
    );
    summary
}

/// Loads one listing page and reads its fields.
///
/// `Ok(None)` means the page had no title and is unusable.
async fn extract_listing(
    fetcher: &mut dyn PageFetcher,
    candidate: &Candidate,
    plan: &CrawlPlan,
) -> Result<Option<ListingRecord>> {
    let config = &plan.config;
    fetcher.navigate(&candidate.url).await?;

    let cookie_timeout = Duration::from_millis(config.pacing.cookie_timeout_ms);
    match fetcher
        .wait_until_clickable(&config.selectors.cookie_accept, cookie_timeout)
        .await
    {
        Ok(()) => info!("Accepted cookies."),
        Err(e) => debug!("No cookie banner: {:#}", e),
    }

    info!("Processing: {}", candidate.url);
    let html = fetcher
        .content()
        .await
        .with_context(|| format!("Could not read {}", candidate.url))?;

    let Some(fields) = parse_listing(&html, &plan.selectors, &plan.prices) else {
        return Ok(None);
    };

    let mut record = ListingRecord::new(&config.search.site_prefix, candidate, fields.title);
    record.area = fields.area;
    record.description = fields.description;
    record.bedrooms = fields.bedrooms;
    record.price = fields.price;
    record.location = fields
        .map_src
        .as_deref()
        .and_then(extract_coordinates)
        .map(|(latitude, longitude)| Location {
            latitude,
            longitude,
        });
    record.img = collect_images(fetcher, html, plan).await;

    Ok(Some(record))
}

/// Walks the image carousel, taking each slide's source in turn.
///
/// Stops when the next button can no longer be clicked or every slide has
/// been visited. Slides without a source are left out.
async fn collect_images(
    fetcher: &mut dyn PageFetcher,
    html: String,
    plan: &CrawlPlan,
) -> Vec<String> {
    let next_button = &plan.config.selectors.carousel_next;
    let step = Duration::from_millis(plan.config.pacing.carousel_step_ms);

    let mut sources = carousel_sources(&html, &plan.selectors);
    let slides = sources.len();
    let mut images = Vec::with_capacity(slides);

    for index in 0..slides {
        if let Some(src) = sources.get(index).cloned().flatten() {
            images.push(src);
        }

        if let Err(e) = fetcher.click(next_button).await {
            debug!("Carousel ended after {} slides: {:#}", index + 1, e);
            break;
        }
        tokio::time::sleep(step).await;

        if index + 1 < slides {
            // Sources load lazily as slides come into view.
            match fetcher.content().await {
                Ok(html) => sources = carousel_sources(&html, &plan.selectors),
                Err(e) => {
                    debug!("Could not re-read carousel: {:#}", e);
                    break;
                }
            }
        }
    }

    images
}
