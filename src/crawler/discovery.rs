use crate::crawler::CrawlPlan;
use crate::models::Candidate;
use crate::recency::is_recent;
use crate::scrapers::page::{parse_search_results, ResultTile};
use crate::scrapers::PageFetcher;
use crate::store::CheckpointStore;
use anyhow::{Context, Result};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// How the discovery phase ended
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryOutcome {
    /// Candidates from an earlier, unfinished run were still queued
    Resumed { pending: usize },
    /// Every page up to the cap was visited
    Finished { pages: u32, added: usize },
    /// A page could not be fetched; candidates found so far were kept
    Aborted { page: u32, added: usize, reason: String },
}

/// What a single result tile amounts to
#[derive(Debug, Clone, PartialEq)]
pub enum TileVerdict {
    Recent(String),
    Featured,
    Stale(String),
    Broken(String),
}

/// Fills the discovered store from the search result pages.
///
/// Does nothing when the store already holds candidates. All pages up to
/// `max-pages` are visited; a page that cannot be loaded ends the phase.
/// Whatever was found is saved before returning.
#[instrument(skip_all, fields(phase = "discovery"))]
pub async fn discover(
    fetcher: &mut dyn PageFetcher,
    discovered: &mut CheckpointStore<Candidate>,
    plan: &CrawlPlan,
) -> DiscoveryOutcome {
    if !discovered.is_empty() {
        info!(
            "{} candidates pending in {}, resuming extraction",
            discovered.len(),
            discovered.path().display()
        );
        return DiscoveryOutcome::Resumed {
            pending: discovered.len(),
        };
    }

    let search = &plan.config.search;
    let mut added = 0;
    let mut outcome = None;

    for page in 1..=search.max_pages {
        let page_url = format!("{}{}", search.url_template, page);

        let candidates = match scan_page(fetcher, &page_url, plan).await {
            Ok(candidates) => candidates,
            Err(e) => {
                error!(page, url = %page_url, "Discovery stopped: {:#}", e);
                outcome = Some(DiscoveryOutcome::Aborted {
                    page,
                    added,
                    reason: format!("{:#}", e),
                });
                break;
            }
        };

        let found = candidates.len();
        for candidate in candidates {
            match discovered.append(&candidate) {
                Ok(_) => added += 1,
                Err(e) => warn!(url = %candidate.url, "Could not queue candidate: {}", e),
            }
        }
        info!("Page {} - {} recent listings", page, found);
    }

    if let Err(e) = discovered.save() {
        error!("Failed to save discovered listings: {}", e);
    }
    info!("Discovered {} candidates", added);

    outcome.unwrap_or(DiscoveryOutcome::Finished {
        pages: search.max_pages,
        added,
    })
}

/// Loads one search page and returns its recent, non-featured listings.
async fn scan_page(
    fetcher: &mut dyn PageFetcher,
    page_url: &str,
    plan: &CrawlPlan,
) -> Result<Vec<Candidate>> {
    fetcher.navigate(page_url).await?;
    tokio::time::sleep(Duration::from_millis(plan.config.pacing.page_delay_ms)).await;

    let html = fetcher
        .content()
        .await
        .with_context(|| format!("Could not read {}", page_url))?;
    let base = Url::parse(page_url).with_context(|| format!("Invalid search URL {}", page_url))?;
    let marker = &plan.config.search.featured_marker;

    let mut candidates = Vec::new();
    for tile in parse_search_results(&html, &plan.selectors) {
        match judge_tile(&tile, &base, marker) {
            TileVerdict::Recent(url) => {
                debug!("Listing URL: {}", url);
                candidates.push(Candidate {
                    url,
                    found: Utc::now().timestamp_millis(),
                });
            }
            TileVerdict::Featured => debug!("Featured"),
            TileVerdict::Stale(label) => debug!("Too old: {}", label),
            TileVerdict::Broken(reason) => {
                warn!(page = %page_url, "Error processing post: {}", reason)
            }
        }
    }

    Ok(candidates)
}

/// Applies the featured and recency filters to one result tile.
pub fn judge_tile(tile: &ResultTile, base: &Url, featured_marker: &str) -> TileVerdict {
    let Some(href) = tile.href.as_deref() else {
        return TileVerdict::Broken("anchor has no href".to_string());
    };
    if tile.text.contains(featured_marker) {
        return TileVerdict::Featured;
    }
    let Some(label) = tile.date_posted.as_deref() else {
        return TileVerdict::Broken(format!("no date posted for {}", href));
    };
    if !is_recent(label) {
        return TileVerdict::Stale(label.to_string());
    }

    match base.join(href) {
        Ok(url) => TileVerdict::Recent(url.to_string()),
        Err(e) => TileVerdict::Broken(format!("bad href {}: {}", href, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(href: Option<&str>, text: &str, date: Option<&str>) -> ResultTile {
        ResultTile {
            href: href.map(str::to_string),
            text: text.to_string(),
            date_posted: date.map(str::to_string),
        }
    }

    fn base() -> Url {
        Url::parse("https://www.gumtree.com/search?page=1").unwrap()
    }

    #[test]
    fn recent_tile_resolves_relative_href() {
        let tile = tile(Some("/p/flat/42"), "Flat 2 hours ago", Some("2 hours ago"));
        let verdict = judge_tile(&tile, &base(), "Featured");
        assert_eq!(verdict, TileVerdict::Recent("https://www.gumtree.com/p/flat/42".to_string()));
    }

    #[test]
    fn absolute_href_is_kept() {
        let tile = tile(Some("https://other.example/p/7"), "Flat", Some("Just now"));
        let verdict = judge_tile(&tile, &base(), "Featured");
        assert_eq!(verdict, TileVerdict::Recent("https://other.example/p/7".to_string()));
    }

    #[test]
    fn featured_wins_over_recency() {
        let tile = tile(Some("/p/1"), "Featured Flat", Some("Just now"));
        let verdict = judge_tile(&tile, &base(), "Featured");
        assert_eq!(verdict, TileVerdict::Featured);
    }

    #[test]
    fn stale_and_broken_tiles() {
        assert_eq!(
            judge_tile(&tile(Some("/p/1"), "Flat", Some("5 days ago")), &base(), "Featured"),
            TileVerdict::Stale("5 days ago".to_string())
        );
        assert!(matches!(
            judge_tile(&tile(Some("/p/1"), "Flat", None), &base(), "Featured"),
            TileVerdict::Broken(_)
        ));
        assert!(matches!(
            judge_tile(&tile(None, "Flat", Some("Just now")), &base(), "Featured"),
            TileVerdict::Broken(_)
        ));
    }
}
