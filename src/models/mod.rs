use serde::{Deserialize, Serialize};

/// A discovered listing URL waiting for detail extraction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub url: String,
    /// Discovery time in epoch milliseconds
    pub found: i64,
}

/// Geolocation of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Fully extracted listing, written to the completed store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    pub website_id: String,
    pub link: String,
    #[serde(default)]
    pub found: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    /// Whole currency units
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default = "default_bathrooms")]
    pub bathrooms: u32,

    // Not extracted yet
    #[serde(default)]
    pub garden: Option<bool>,
    #[serde(default)]
    pub pets: Option<bool>,
    #[serde(default)]
    pub balcony: Option<bool>,
    #[serde(default)]
    pub floorspace: Option<f64>,
    #[serde(default, rename = "price_per_m²")]
    pub price_per_sqm: Option<f64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub furnished: Option<bool>,

    #[serde(default)]
    pub img: Vec<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

fn default_bathrooms() -> u32 {
    1
}

impl ListingRecord {
    /// Builds a record with every optional field empty.
    pub fn new(site_prefix: &str, candidate: &Candidate, title: String) -> Self {
        Self {
            website_id: website_id(site_prefix, &candidate.url),
            link: candidate.url.clone(),
            found: Some(candidate.found),
            title,
            area: None,
            description: String::new(),
            bedrooms: None,
            price: None,
            bathrooms: default_bathrooms(),
            garden: None,
            pets: None,
            balcony: None,
            floorspace: None,
            price_per_sqm: None,
            phone: None,
            furnished: None,
            img: Vec::new(),
            location: None,
        }
    }
}

/// `<prefix>_<last path segment>`, ignoring query, fragment and trailing slashes.
pub fn website_id(site_prefix: &str, url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    format!("{}_{}", site_prefix, segment)
}
