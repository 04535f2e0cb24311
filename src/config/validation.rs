use crate::config::types::{Config, FetcherConfig};
use crate::ConfigError;
use reqwest::header::HeaderValue;

const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_REDIRECTS: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    if config.max_redirects > MAX_REDIRECTS {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= {}, got {}",
            MAX_REDIRECTS, config.max_redirects
        )));
    }

    validate_header_value("accept", &config.accept)?;
    validate_header_value("accept_language", &config.accept_language)?;
    validate_user_agents(&config.user_agents)?;

    Ok(())
}

/// Validates the User-Agent pool: non-empty, every entry usable as a header
fn validate_user_agents(user_agents: &[String]) -> Result<(), ConfigError> {
    if user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "user_agents must contain at least one entry".to_string(),
        ));
    }

    for user_agent in user_agents {
        validate_header_value("user_agents", user_agent)?;
    }

    Ok(())
}

/// Checks that a value is non-empty and legal inside an HTTP header
fn validate_header_value(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} cannot be empty",
            field
        )));
    }

    if HeaderValue::from_str(value).is_err() {
        return Err(ConfigError::Validation(format!(
            "{} contains characters not allowed in an HTTP header: '{}'",
            field, value
        )));
    }

    Ok(())
}
