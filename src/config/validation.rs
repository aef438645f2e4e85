//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and required
//! credentials. Every check runs so callers see all problems at once.

use std::net::SocketAddr;

use reqwest::header::HeaderValue;
use thiserror::Error;

use crate::config::schema::{ClientConfig, ProxyConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate the client section.
pub fn validate_client_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.secret.trim().is_empty() {
        errors.push(ValidationError::new("secret", "must be a non-empty string"));
    } else if HeaderValue::from_str(&config.secret).is_err() {
        errors.push(ValidationError::new(
            "secret",
            "must only contain visible ASCII characters",
        ));
    }

    if config.account_id.trim().is_empty() {
        errors.push(ValidationError::new("account_id", "must be a non-empty string"));
    }

    match config.commission_rate.trim().parse::<f64>() {
        Ok(rate) if (0.0..=2.0).contains(&rate) => {}
        _ => errors.push(ValidationError::new(
            "commission_rate",
            format!(
                "must be a number between 0 and 2, got '{}'",
                config.commission_rate
            ),
        )),
    }

    match url::Url::parse(&config.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::new(
            "base_url",
            format!("must be an absolute http(s) URL, got '{}'", config.base_url),
        )),
    }

    let retries = &config.retries;
    if retries.base_delay_ms == 0 {
        errors.push(ValidationError::new("retries.base_delay_ms", "must be greater than 0"));
    }
    if !(retries.backoff_multiplier.is_finite() && retries.backoff_multiplier > 1.0) {
        errors.push(ValidationError::new(
            "retries.backoff_multiplier",
            "must be a finite number greater than 1",
        ));
    }
    if retries.cap_delay_ms == 0 {
        errors.push(ValidationError::new("retries.cap_delay_ms", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a full proxy configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = match validate_client_config(&config.client) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!(
                "must be a socket address, got '{}'",
                config.listener.bind_address
            ),
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RetryConfig;

    #[test]
    fn test_valid_client_config() {
        let config = ClientConfig::new("secret", "account");
        assert!(validate_client_config(&config).is_ok());
    }

    #[test]
    fn test_missing_credentials_reported_together() {
        let config = ClientConfig::new("  ", "");
        let errors = validate_client_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["secret", "account_id"]);
        assert_eq!(errors[0].to_string(), "secret must be a non-empty string");
    }

    #[test]
    fn test_commission_rate_range() {
        let config = ClientConfig::new("secret", "account").with_commission_rate("2.5");
        let errors = validate_client_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "commission_rate");

        let config = ClientConfig::new("secret", "account").with_commission_rate("abc");
        assert!(validate_client_config(&config).is_err());

        let config = ClientConfig::new("secret", "account").with_commission_rate("0");
        assert!(validate_client_config(&config).is_ok());
    }

    #[test]
    fn test_retry_ranges() {
        let config = ClientConfig::new("secret", "account").with_retries(RetryConfig {
            max_retries: 0,
            base_delay_ms: 0,
            backoff_multiplier: 1.0,
            cap_delay_ms: 0,
        });
        let errors = validate_client_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "retries.base_delay_ms",
                "retries.backoff_multiplier",
                "retries.cap_delay_ms"
            ]
        );
    }

    #[test]
    fn test_base_url_must_be_http() {
        let config = ClientConfig::new("secret", "account").with_base_url("ftp://example.com");
        assert!(validate_client_config(&config).is_err());

        let config = ClientConfig::new("secret", "account").with_base_url("not a url");
        assert!(validate_client_config(&config).is_err());
    }

    #[test]
    fn test_proxy_bind_address() {
        let mut config = ProxyConfig::default();
        config.client = ClientConfig::new("secret", "account");
        assert!(validate_config(&config).is_ok());

        config.listener.bind_address = "localhost".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "listener.bind_address");
    }
}
