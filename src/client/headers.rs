//! Header composition.
//!
//! Every variant is derived from the client configuration on demand; no
//! header state lives on the client, so one call can never leak headers into
//! another.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};

use crate::client::error::TransportError;
use crate::config::ClientConfig;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
pub const SECRET_HEADER: &str = "x-sideshift-secret";
pub const COMMISSION_HEADER: &str = "commissionRate";
pub const USER_IP_HEADER: &str = "x-user-ip";

/// Replacement rendered for the shared secret in diagnostics.
pub const FILTERED: &str = "[FILTERED]";

/// Ordered set of request headers.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(&'static str, String)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any existing value with the same name.
    pub fn insert(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(name, value)| (*name, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First header whose value cannot be sent over HTTP.
    pub fn invalid_header(&self) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, value)| HeaderValue::from_str(value).is_err())
            .map(|(name, _)| *name)
    }

    /// Convert into the wire representation.
    pub fn to_header_map(&self) -> Result<HeaderMap, TransportError> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::request(format!("invalid header name {name}: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::request(format!("invalid value for {name}: {e}")))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }

    /// Copy with the shared secret replaced by [`FILTERED`].
    pub fn masked(&self) -> HeaderSet {
        let entries = self
            .entries
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case(SECRET_HEADER) {
                    (*name, FILTERED.to_string())
                } else {
                    (*name, value.clone())
                }
            })
            .collect();
        HeaderSet { entries }
    }
}

impl std::fmt::Debug for HeaderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.masked().entries).finish()
    }
}

/// `Content-Type: application/json`.
pub fn base_headers() -> HeaderSet {
    HeaderSet::new().with(CONTENT_TYPE, "application/json")
}

/// Base headers plus the shared secret, for account-scoped endpoints.
pub fn token_headers(config: &ClientConfig) -> HeaderSet {
    base_headers().with(SECRET_HEADER, config.secret.clone())
}

/// Token headers plus the commission rate when it is not the API default.
pub fn commission_headers(config: &ClientConfig) -> HeaderSet {
    let headers = token_headers(config);
    if config.has_custom_commission() {
        headers.with(COMMISSION_HEADER, config.commission_rate.clone())
    } else {
        headers
    }
}

/// Commission headers plus `x-user-ip` when a non-empty address is given.
pub fn user_ip_headers(config: &ClientConfig, user_ip: Option<&str>) -> HeaderSet {
    let headers = commission_headers(config);
    match user_ip.map(str::trim).filter(|ip| !ip.is_empty()) {
        Some(ip) => headers.with(USER_IP_HEADER, ip),
        None => headers,
    }
}

/// Headers for the binary icon endpoint.
pub fn image_headers() -> HeaderSet {
    HeaderSet::new().with(ACCEPT, "image/svg")
}

/// Render headers for diagnostics, masking the shared secret.
pub fn filter_headers(headers: Option<&HeaderSet>) -> String {
    let Some(headers) = headers else {
        return "None".to_string();
    };

    let map: Map<String, Value> = headers
        .masked()
        .iter()
        .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
        .collect();

    serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_else(|_| "{}".to_string())
}
