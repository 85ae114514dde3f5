use anyhow::Context;
use clap::Parser;
use rental_scout::config::load_config_or_default;
use rental_scout::crawler::DiscoveryOutcome;
use rental_scout::scrapers::FetcherKind;
use rental_scout::Crawler;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Crawl recent rental listings into a resumable JSON output file
#[derive(Parser, Debug)]
#[command(name = "rental-scout", version, about, long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "rental-scout.toml")]
    config: PathBuf,

    /// Page fetcher backend
    #[arg(long, value_enum, default_value_t = FetcherKind::Chrome)]
    fetcher: FetcherKind,

    /// Override the number of search pages visited
    #[arg(long)]
    max_pages: Option<u32>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    info!("🏠 Rental Scout");
    info!("===============");

    let mut config = load_config_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(max_pages) = cli.max_pages {
        config.search.max_pages = max_pages.max(1);
    }

    let fetcher = cli.fetcher.build(&config.browser)?;
    let crawler = Crawler::new(config, fetcher)?;
    let report = crawler.run().await?;

    match &report.discovery {
        DiscoveryOutcome::Resumed { pending } => {
            info!("Resumed {} pending listings from the previous run", pending)
        }
        DiscoveryOutcome::Finished { pages, added } => {
            info!("Discovered {} listings across {} pages", added, pages)
        }
        DiscoveryOutcome::Aborted { page, added, reason } => {
            info!("Discovery stopped at page {} after {} listings: {}", page, added, reason)
        }
    }
    info!(
        "✅ Extracted {} new listings ({} duplicates, {} failed)",
        report.extraction.extracted, report.extraction.duplicates, report.extraction.failed
    );
    info!("💾 {} listings in output", report.completed_total);

    Ok(())
}

/// Sets up the tracing subscriber; `RUST_LOG` takes precedence over the flags
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("rental_scout=info,warn"),
                1 => EnvFilter::new("rental_scout=debug,info"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
