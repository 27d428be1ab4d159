use crate::config::types::{Config, FieldEntry, HttpConfig, IndexConfig, OutputConfig, ThrottleConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_index_config(&config.index)?;
    validate_output_config(&config.output)?;
    validate_http_config(&config.http)?;
    validate_throttle_config(&config.throttle)?;
    validate_fields(&config.fields)?;
    Ok(())
}

/// Validates the listing index configuration
fn validate_index_config(config: &IndexConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid index URL '{}': {}", config.url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Index URL must use http or https scheme, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "Index URL '{}' has no host",
            config.url
        )));
    }

    if config.page_param.is_empty() {
        return Err(ConfigError::Validation(
            "page-param cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    if config.delimiter.len() != 1 || !config.delimiter.is_ascii() {
        return Err(ConfigError::Validation(format!(
            "delimiter must be a single ASCII character, got '{}'",
            config.delimiter
        )));
    }

    Ok(())
}

/// Validates HTTP configuration
///
/// Header names must be HTTP token characters; values must not contain
/// control characters. Checked here so client construction never trips
/// over config typos mid-run.
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    for (name, value) in &config.headers {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::Validation(format!(
                "Invalid header name '{}'",
                name
            )));
        }

        if value.chars().any(|c| c.is_control()) {
            return Err(ConfigError::Validation(format!(
                "Header '{}' value contains control characters",
                name
            )));
        }
    }

    if let Some(proxy) = &config.proxy {
        let url = Url::parse(&proxy.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy URL '{}': {}", proxy.url, e)))?;

        if !matches!(url.scheme(), "http" | "https" | "socks5" | "socks5h") {
            return Err(ConfigError::Validation(format!(
                "Proxy URL must use http, https or socks5 scheme, got '{}'",
                url.scheme()
            )));
        }
    }

    Ok(())
}

/// Validates the throttle configuration
fn validate_throttle_config(config: &ThrottleConfig) -> Result<(), ConfigError> {
    if config.jitter_min_ms > config.jitter_max_ms {
        return Err(ConfigError::Validation(format!(
            "jitter-min-ms ({}) must not exceed jitter-max-ms ({})",
            config.jitter_min_ms, config.jitter_max_ms
        )));
    }

    Ok(())
}

/// Validates the field-selection entries
///
/// Unknown field names are allowed here: the extractor registry degrades
/// them to absent values at runtime. Only structural problems are rejected.
fn validate_fields(fields: &[FieldEntry]) -> Result<(), ConfigError> {
    if fields.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[fields]] entry is required".to_string(),
        ));
    }

    if !fields.iter().any(|f| f.include) {
        return Err(ConfigError::Validation(
            "at least one field must have include = true".to_string(),
        ));
    }

    for entry in fields {
        if entry.name.is_empty() {
            return Err(ConfigError::Validation(
                "field name cannot be empty".to_string(),
            ));
        }
    }

    let mut seen = std::collections::HashSet::new();
    for entry in fields {
        if !seen.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate field entry '{}'",
                entry.name
            )));
        }
    }

    Ok(())
}
