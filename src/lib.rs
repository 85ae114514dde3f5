//! Rental Scout: a resumable two-phase crawler for classified rental listings.
//!
//! Discovery collects recently posted listing URLs from the search results;
//! extraction visits each one and records its details. Progress lives in two
//! JSON checkpoint files so an interrupted run picks up where it stopped.

pub mod config;
pub mod crawler;
pub mod geo;
pub mod models;
pub mod recency;
pub mod scrapers;
pub mod store;

pub use config::Config;
pub use crawler::{CrawlReport, Crawler};
pub use models::{Candidate, ListingRecord, Location};
pub use store::CheckpointStore;
