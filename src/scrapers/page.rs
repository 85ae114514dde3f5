//! Field lookup over a rendered DOM snapshot.
//!
//! Fetchers hand back the page HTML; everything here is synchronous and
//! returns owned data so no parsed document is held across an await point.
//! Each lookup yields `Option`: a missing element or attribute means the
//! field is absent, never an error.

use crate::config::{ConfigError, ConfigResult, SelectorConfig};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Compiled form of [`SelectorConfig`]
#[derive(Debug, Clone)]
pub struct PageSelectors {
    pub result_anchor: Selector,
    pub date_posted: Selector,
    pub title: Selector,
    pub area: Selector,
    pub description: Selector,
    pub bedrooms: Selector,
    pub price: Selector,
    pub image_carousel: Selector,
    pub map: Selector,
    image: Selector,
}

impl PageSelectors {
    pub fn compile(config: &SelectorConfig) -> ConfigResult<Self> {
        // Click targets are handed to the fetcher as strings, but must still parse.
        compile("cookie-accept", &config.cookie_accept)?;
        compile("carousel-next", &config.carousel_next)?;

        Ok(Self {
            result_anchor: compile("result-anchor", &config.result_anchor)?,
            date_posted: compile("date-posted", &config.date_posted)?,
            title: compile("title", &config.title)?,
            area: compile("area", &config.area)?,
            description: compile("description", &config.description)?,
            bedrooms: compile("bedrooms", &config.bedrooms)?,
            price: compile("price", &config.price)?,
            image_carousel: compile("image-carousel", &config.image_carousel)?,
            map: compile("map", &config.map)?,
            image: compile("image", "img")?,
        })
    }
}

fn compile(field: &'static str, css: &str) -> ConfigResult<Selector> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
        field,
        message: format!("{:?}", e),
    })
}

/// One anchor on a search results page
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTile {
    pub href: Option<String>,
    pub text: String,
    pub date_posted: Option<String>,
}

/// Enumerates the result anchors of a search page.
pub fn parse_search_results(html: &str, selectors: &PageSelectors) -> Vec<ResultTile> {
    let document = Html::parse_document(html);
    document
        .select(&selectors.result_anchor)
        .map(|anchor| ResultTile {
            href: anchor.value().attr("href").map(str::to_string),
            text: collapsed_text(anchor),
            date_posted: anchor.select(&selectors.date_posted).next().map(collapsed_text),
        })
        .collect()
}

/// Fields read from a single listing page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFields {
    pub title: String,
    pub area: Option<String>,
    pub description: String,
    pub bedrooms: Option<u32>,
    pub price: Option<u64>,
    pub map_src: Option<String>,
}

/// Reads a listing page. `None` when the page has no usable title.
pub fn parse_listing(
    html: &str,
    selectors: &PageSelectors,
    prices: &PricePattern,
) -> Option<ListingFields> {
    let document = Html::parse_document(html);
    let find = |selector: &Selector| document.select(selector).next();

    let title = find(&selectors.title)
        .map(collapsed_text)
        .filter(|t| !t.is_empty())?;

    Some(ListingFields {
        title,
        area: find(&selectors.area).map(collapsed_text),
        description: find(&selectors.description)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default(),
        bedrooms: find(&selectors.bedrooms).and_then(|el| collapsed_text(el).parse().ok()),
        price: find(&selectors.price).and_then(|el| prices.parse(&collapsed_text(el))),
        map_src: find(&selectors.map)
            .and_then(|el| el.value().attr("src").map(str::to_string)),
    })
}

/// Image sources inside the carousel, in DOM order.
///
/// Slides that have not loaded yet carry no source and show up as `None`.
pub fn carousel_sources(html: &str, selectors: &PageSelectors) -> Vec<Option<String>> {
    let document = Html::parse_document(html);
    let Some(carousel) = document.select(&selectors.image_carousel).next() else {
        return Vec::new();
    };
    carousel
        .select(&selectors.image)
        .map(|img| {
            let attrs = img.value();
            attrs
                .attr("src")
                .or_else(|| attrs.attr("data-src"))
                .filter(|src| !src.is_empty())
                .map(str::to_string)
        })
        .collect()
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Currency-prefixed price matcher, e.g. `£1,250.00 pcm` -> 1250
#[derive(Debug, Clone)]
pub struct PricePattern {
    pattern: Regex,
}

impl PricePattern {
    pub fn new(currency_symbol: &str) -> Self {
        let source = format!(r"{}([\d,]+)(?:\.\d{{2}})?", regex::escape(currency_symbol));
        let pattern =
            Regex::new(&source).expect("escaped currency symbol always forms a valid pattern");
        Self { pattern }
    }

    /// Integer part of the first currency-prefixed amount in `text`.
    pub fn parse(&self, text: &str) -> Option<u64> {
        let digits = self.pattern.captures(text)?[1].replace(',', "");
        digits.parse().ok()
    }
}
