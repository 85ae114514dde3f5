//! Configuration loading and validation.
//!
//! Every key is optional; a missing file means the built-in Gumtree defaults.
//!
//! ```toml
//! [search]
//! max-pages = 10
//!
//! [pacing]
//! listing-delay-ms = 1500
//! ```

mod parser;
mod types;
mod validation;

pub use parser::{load_config, load_config_or_default};
pub use types::{BrowserConfig, Config, PacingConfig, SearchConfig, SelectorConfig, StorageConfig};
pub use validation::validate;

use thiserror::Error;

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid selector for {field}: {message}")]
    InvalidSelector { field: &'static str, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
