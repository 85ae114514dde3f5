use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub search: SearchConfig,
    pub storage: StorageConfig,
    pub pacing: PacingConfig,
    pub browser: BrowserConfig,
    pub selectors: SelectorConfig,
}

/// What to crawl and how records are labelled
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    /// Search URL; the page number is appended to it
    pub url_template: String,

    /// Number of search result pages visited per discovery run
    pub max_pages: u32,

    /// Prefix of each record's `website_id`
    pub site_prefix: String,

    /// Symbol that precedes prices in the ad
    pub currency_symbol: String,

    /// Text that marks a promoted result tile
    pub featured_marker: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url_template: "https://www.gumtree.com/search?search_location=uk&search_category=property-to-rent&sort=date&page="
                .to_string(),
            max_pages: 50,
            site_prefix: "gumtree".to_string(),
            currency_symbol: "£".to_string(),
            featured_marker: "Featured".to_string(),
        }
    }
}

/// Checkpoint file locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Transient queue of discovered listing URLs
    pub discovered_path: String,

    /// Durable output of extracted listings
    pub completed_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            discovered_path: "temp.json".to_string(),
            completed_path: "output.json".to_string(),
        }
    }
}

/// Fixed politeness delays (milliseconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PacingConfig {
    pub page_delay_ms: u64,
    pub listing_delay_ms: u64,
    pub carousel_step_ms: u64,
    pub cookie_timeout_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: 500,
            listing_delay_ms: 500,
            carousel_step_ms: 50,
            cookie_timeout_ms: 1000,
        }
    }
}

/// Page fetcher settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserConfig {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,

    /// User agent for the plain HTTP fetcher
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// CSS selectors locating each field in the rendered DOM
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    pub result_anchor: String,
    pub date_posted: String,
    pub cookie_accept: String,
    pub title: String,
    pub area: String,
    pub description: String,
    pub bedrooms: String,
    pub price: String,
    pub image_carousel: String,
    pub carousel_next: String,
    pub map: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            result_anchor: r#"[data-q="search-result-anchor"]"#.to_string(),
            date_posted: r#"[data-q="tile-datePosted"]"#.to_string(),
            cookie_accept: "#onetrust-accept-btn-handler".to_string(),
            title: r#"[data-q="vip-title"]"#.to_string(),
            area: "#content > div:nth-of-type(1) > div > main > div:nth-of-type(3) > div:nth-of-type(1) > div > div > span:nth-of-type(1) > h4"
                .to_string(),
            description: r#"[itemprop="description"]"#.to_string(),
            bedrooms: r#"[data-q="Number of bedrooms-value"]"#.to_string(),
            price: r#"[data-q="ad-price"]"#.to_string(),
            image_carousel: r#"[data-q="image-carousel"]"#.to_string(),
            carousel_next: r#"[data-q="carouselNext"]"#.to_string(),
            map: r#"[title="Map"]"#.to_string(),
        }
    }
}
