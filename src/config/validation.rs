use crate::config::types::{CategoryEntry, Config, CrawlerConfig, DetailedConfig, UserAgentConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_detailed_config(&config.detailed)?;
    validate_output_config(config)?;
    validate_categories(&config.categories)?;
    Ok(())
}

/// Validates the politeness policy
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.request_delay > 60_000 {
        return Err(ConfigError::Validation(format!(
            "request_delay must be <= 60000ms, got {}ms",
            config.request_delay
        )));
    }

    if config.retry_count > 10 {
        return Err(ConfigError::Validation(format!(
            "retry_count must be <= 10, got {}",
            config.retry_count
        )));
    }

    if config.retry_delay > 60_000 {
        return Err(ConfigError::Validation(format!(
            "retry_delay must be <= 60000ms, got {}ms",
            config.retry_delay
        )));
    }

    if config.depth_limit < 1 || config.depth_limit > 2 {
        return Err(ConfigError::Validation(format!(
            "depth_limit must be 1 or 2, got {}",
            config.depth_limit
        )));
    }

    if config.request_timeout < 1000 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1000ms, got {}ms",
            config.request_timeout
        )));
    }

    if config.run_timeout == Some(0) {
        return Err(ConfigError::Validation(
            "run_timeout must be > 0 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if let Some(value) = &config.override_value {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user agent override cannot be empty".to_string(),
            ));
        }
        return Ok(());
    }

    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

fn validate_detailed_config(config: &DetailedConfig) -> Result<(), ConfigError> {
    if config.max_open_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_open_pages must be >= 1, got {}",
            config.max_open_pages
        )));
    }

    if config.settle_time > 30_000 {
        return Err(ConfigError::Validation(format!(
            "settle_time must be <= 30000ms, got {}ms",
            config.settle_time
        )));
    }

    Ok(())
}

/// Validates output column names
fn validate_output_config(config: &Config) -> Result<(), ConfigError> {
    let output = &config.output;

    if output.email_column.is_empty() {
        return Err(ConfigError::Validation(
            "email_column cannot be empty".to_string(),
        ));
    }

    if output.error_column.is_empty() {
        return Err(ConfigError::Validation(
            "error_column cannot be empty".to_string(),
        ));
    }

    if output.email_column == output.error_column {
        return Err(ConfigError::Validation(format!(
            "email_column and error_column must differ, both are '{}'",
            output.email_column
        )));
    }

    if config.input.website_column.is_empty() {
        return Err(ConfigError::Validation(
            "website_column cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the category table entries
fn validate_categories(categories: &[CategoryEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in categories {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category '{}'",
                entry.name
            )));
        }

        if entry.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "category '{}' must have at least one keyword",
                entry.name
            )));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
