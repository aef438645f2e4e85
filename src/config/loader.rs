//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `client.secret`.
pub const ENV_SECRET: &str = "SIDESHIFT_SECRET";
/// Environment variable overriding `client.account_id`.
pub const ENV_ACCOUNT_ID: &str = "SIDESHIFT_ID";
/// Environment variable overriding `client.commission_rate`.
pub const ENV_COMMISSION_RATE: &str = "SIDESHIFT_COMMISSION_RATE";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, applying environment
/// overrides before validation.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ProxyConfig = toml::from_str(&content)?;
    finish(config, |key| std::env::var(key).ok())
}

/// Build a configuration from defaults and the environment only.
pub fn load_from_env() -> Result<ProxyConfig, ConfigError> {
    finish(ProxyConfig::default(), |key| std::env::var(key).ok())
}

fn finish<F>(mut config: ProxyConfig, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env_overrides(&mut config, lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay credential settings from the environment. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(secret) = non_empty(ENV_SECRET) {
        config.client.secret = secret;
    }
    if let Some(id) = non_empty(ENV_ACCOUNT_ID) {
        config.client.account_id = id;
    }
    if let Some(rate) = non_empty(ENV_COMMISSION_RATE) {
        config.client.commission_rate = rate;
    }
}
