//! HTTP transport seam.
//!
//! The request engine only sees [`Transport`]; production uses reqwest,
//! tests plug in scripted transports.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::client::error::TransportError;
use crate::client::headers::HeaderSet;

/// Method, headers and body of one logical call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderSet,
    /// Serialized JSON body.
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn get(headers: HeaderSet) -> Self {
        Self {
            method: Method::GET,
            headers,
            body: None,
        }
    }

    pub fn post(headers: HeaderSet, body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            headers,
            body: Some(body.into()),
        }
    }
}

/// Fully read HTTP response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl TransportResponse {
    /// Response with the canonical reason phrase for `status`.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Raw payload returned by binary endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// One HTTP exchange. Implementations must not retry on their own.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<TransportResponse, TransportError>;
}

/// Production transport backed by reqwest.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sideshift-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<TransportResponse, TransportError> {
        let mut request = self
            .client
            .request(options.method.clone(), url)
            .headers(options.headers.to_header_map()?);
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
        })
    }
}

/// Join path segments (percent-encoded) and query pairs onto the API root.
pub fn endpoint_url(base: &Url, segments: &[&str], query: &[(&str, String)]) -> String {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    url.to_string()
}
