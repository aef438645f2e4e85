//! Request identification and client address extraction.

use axum::http::{HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a UUID v4 for requests that arrive without an id.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request id as set by the request-id layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// End-user address to forward upstream: `x-user-ip` first, then the
/// left-most `x-forwarded-for` entry.
pub fn forwarded_user_ip(headers: &HeaderMap) -> Option<String> {
    let direct = headers.get("x-user-ip").and_then(|v| v.to_str().ok());
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next());

    direct
        .or(forwarded)
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let request = Request::new(());
        let mut make = UuidRequestId;
        let a = make.make_request_id(&request).unwrap();
        let b = make.make_request_id(&request).unwrap();

        let a = a.header_value().to_str().unwrap().to_string();
        assert!(Uuid::parse_str(&a).is_ok());
        assert_ne!(a, b.header_value().to_str().unwrap());
    }

    #[test]
    fn test_forwarded_user_ip() {
        let mut headers = HeaderMap::new();
        assert_eq!(forwarded_user_ip(&headers), None);

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(forwarded_user_ip(&headers).as_deref(), Some("203.0.113.7"));

        headers.insert("x-user-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(forwarded_user_ip(&headers).as_deref(), Some("198.51.100.2"));
    }

    #[test]
    fn test_request_id_fallback() {
        let headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "unknown");
    }
}
