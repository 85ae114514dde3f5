use crate::config::types::Config;
use crate::config::{ConfigError, ConfigResult};
use crate::scrapers::page::PageSelectors;

/// Checks the configuration for values the crawler cannot work with.
pub fn validate(config: &Config) -> ConfigResult<()> {
    let search = &config.search;
    if search.url_template.trim().is_empty() {
        return Err(ConfigError::Validation("search url-template is empty".to_string()));
    }
    if !search.url_template.starts_with("http://") && !search.url_template.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "search url-template must be an http(s) URL: {}",
            search.url_template
        )));
    }
    if search.max_pages == 0 {
        return Err(ConfigError::Validation("search max-pages must be at least 1".to_string()));
    }
    if search.currency_symbol.is_empty() {
        return Err(ConfigError::Validation("search currency-symbol is empty".to_string()));
    }
    if search.featured_marker.is_empty() {
        return Err(ConfigError::Validation("search featured-marker is empty".to_string()));
    }

    let storage = &config.storage;
    if storage.discovered_path.is_empty() || storage.completed_path.is_empty() {
        return Err(ConfigError::Validation("storage paths must not be empty".to_string()));
    }
    if storage.discovered_path == storage.completed_path {
        return Err(ConfigError::Validation(
            "discovered-path and completed-path must differ".to_string(),
        ));
    }

    PageSelectors::compile(&config.selectors)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn rejects_shared_storage_path() {
        let mut config = Config::default();
        config.storage.completed_path = config.storage.discovered_path.clone();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_non_http_template() {
        let mut config = Config::default();
        config.search.url_template = "ftp://example.com/?page=".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn rejects_unparseable_selector() {
        let mut config = Config::default();
        config.selectors.price = "[data-q=".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector { field: "price", .. })
        ));
    }
}
