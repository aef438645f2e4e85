//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the client and the
//! proxy server. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://sideshift.ai/api/v2";

/// Commission rate the API applies when no `commissionRate` header is sent.
pub const DEFAULT_COMMISSION_RATE: &str = "0.5";

/// Root configuration for the proxy server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// API client configuration (credentials, retries).
    pub client: ClientConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening settings.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// API client configuration.
///
/// Validated once when a [`crate::SideshiftClient`] is constructed and shared
/// read-only by every call afterwards.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Shared secret sent as `x-sideshift-secret` on account-scoped calls.
    pub secret: String,

    /// Account identifier, sent as `affiliateId`.
    #[serde(alias = "id")]
    pub account_id: String,

    /// Commission rate from 0 to 2, kept as the string the API expects.
    pub commission_rate: String,

    /// Emit request diagnostics for every attempt.
    pub verbose: bool,

    /// API root, without trailing slash.
    pub base_url: String,

    /// Retry and backoff tuning.
    pub retries: RetryConfig,
}

impl ClientConfig {
    /// Create a configuration with default tuning for the given credentials.
    pub fn new(secret: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            account_id: account_id.into(),
            ..Self::default()
        }
    }

    pub fn with_commission_rate(mut self, rate: impl Into<String>) -> Self {
        self.commission_rate = rate.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retries(mut self, retries: RetryConfig) -> Self {
        self.retries = retries;
        self
    }

    /// Whether the commission rate differs from the API default.
    pub fn has_custom_commission(&self) -> bool {
        self.commission_rate != DEFAULT_COMMISSION_RATE
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            account_id: String::new(),
            commission_rate: DEFAULT_COMMISSION_RATE.to_string(),
            verbose: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            retries: RetryConfig::default(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("secret", &"[FILTERED]")
            .field("account_id", &self.account_id)
            .field("commission_rate", &self.commission_rate)
            .field("verbose", &self.verbose)
            .field("base_url", &self.base_url)
            .field("retries", &self.retries)
            .finish()
    }
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt (0 disables retries).
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Growth factor applied per retry.
    pub backoff_multiplier: f64,

    /// Upper bound for the exponential part of the delay in milliseconds.
    pub cap_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 2000,
            backoff_multiplier: 2.0,
            cap_delay_ms: 10_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,

    /// Output format of the log lines.
    pub log_format: LogFormat,

    /// Install the Prometheus recorder and serve `/metrics`.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum JSON body size accepted by the proxy, in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}
