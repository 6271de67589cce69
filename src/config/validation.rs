use crate::config::types::{
    Config, ExtractConfig, FetcherConfig, OutputConfig, RetryConfig, SiteConfig,
};
use crate::url::{ID_PLACEHOLDER, PAGE_PLACEHOLDER};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_retry_config(&config.retry)?;
    validate_extract_config(&config.extract)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the URL templates
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_template("listing-url", &config.listing_url, PAGE_PLACEHOLDER)?;
    validate_template("organization-url", &config.organization_url, ID_PLACEHOLDER)?;
    validate_template(
        "organization-jobs-url",
        &config.organization_jobs_url,
        ID_PLACEHOLDER,
    )?;

    if config.first_page < 1 {
        return Err(ConfigError::Validation(format!(
            "first-page must be >= 1, got {}",
            config.first_page
        )));
    }

    Ok(())
}

/// Validates a URL template: must carry its placeholder and expand to an HTTP(S) URL
fn validate_template(name: &str, template: &str, placeholder: &str) -> Result<(), ConfigError> {
    if !template.contains(placeholder) {
        return Err(ConfigError::Validation(format!(
            "{} must contain the {} placeholder, got '{}'",
            name, placeholder, template
        )));
    }

    let sample = template.replace(placeholder, "1");
    let url = Url::parse(&sample)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, template, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} must use http or https, got '{}'",
            name,
            url.scheme()
        )));
    }

    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.request_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-ms must be >= 100ms, got {}ms",
            config.request_timeout_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.timeout_cooldown_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-cooldown-secs must be >= 1, got {}",
            config.timeout_cooldown_secs
        )));
    }

    if config.max_consecutive_skipped_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-consecutive-skipped-pages must be >= 1, got {}",
            config.max_consecutive_skipped_pages
        )));
    }

    Ok(())
}

fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    // Markers are compared after trimming, so a padded marker could never match
    for (name, marker) in [
        ("expiry-marker", &config.expiry_marker),
        ("hiring-marker", &config.hiring_marker),
    ] {
        if marker.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
        if marker.trim() != marker {
            return Err(ConfigError::Validation(format!(
                "{} cannot have surrounding whitespace, got '{}'",
                name, marker
            )));
        }
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.snapshot_path.is_empty() {
        return Err(ConfigError::Validation(
            "snapshot-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_template() {
        assert!(validate_template("t", "https://example.com/?page={page}", "{page}").is_ok());
        assert!(validate_template("t", "http://127.0.0.1:8080/c/{id}", "{id}").is_ok());

        assert!(validate_template("t", "https://example.com/", "{page}").is_err());
        assert!(validate_template("t", "not a url {page}", "{page}").is_err());
        assert!(validate_template("t", "ftp://example.com/{id}", "{id}").is_err());
    }

    #[test]
    fn test_validate_retry_config() {
        let mut retry = RetryConfig::default();
        assert!(validate_retry_config(&retry).is_ok());

        retry.timeout_cooldown_secs = 0;
        assert!(validate_retry_config(&retry).is_err());

        retry.timeout_cooldown_secs = 300;
        retry.max_consecutive_skipped_pages = 0;
        assert!(validate_retry_config(&retry).is_err());
    }

    #[test]
    fn test_validate_markers() {
        let mut extract = ExtractConfig::default();
        assert!(validate_extract_config(&extract).is_ok());

        extract.expiry_marker = " (expired) ".to_string();
        assert!(validate_extract_config(&extract).is_err());

        extract.expiry_marker = "".to_string();
        assert!(validate_extract_config(&extract).is_err());
    }

    #[test]
    fn test_validate_fetcher_timeout() {
        let fetcher = FetcherConfig {
            request_timeout_ms: 10,
            ..FetcherConfig::default()
        };
        assert!(validate_fetcher_config(&fetcher).is_err());
    }
}
