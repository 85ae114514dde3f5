use crate::config::types::Config;
use crate::config::validation::validate;
use crate::config::ConfigResult;
use std::path::Path;
use tracing::info;

/// Loads, parses and validates the TOML configuration at `path`.
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the default configuration.
pub fn load_config_or_default(path: &Path) -> ConfigResult<Config> {
    if !path.exists() {
        info!("No config at {}, using defaults", path.display());
        let config = Config::default();
        validate(&config)?;
        return Ok(config);
    }
    load_config(path)
}
