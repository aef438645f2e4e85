//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with one route per client method
//! - Wire up middleware (request id, trace span, body limit)
//! - Serve on a bound listener until shutdown is signalled

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Request};
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::client::SideshiftClient;
use crate::config::ProxyConfig;
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::routes::{self, AppState};

/// HTTP proxy in front of a [`SideshiftClient`].
pub struct ProxyServer {
    router: Router,
    config: ProxyConfig,
}

impl ProxyServer {
    pub fn new(
        config: ProxyConfig,
        client: SideshiftClient,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let state = AppState { client, metrics };
        let router = build_router(state, config.security.max_body_size);
        Self { router, config }
    }

    /// Router with all layers applied; handy for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Serve until a message arrives on `shutdown`, then drain in-flight
    /// requests and return.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState, max_body_size: usize) -> Router {
    let request_id_header = HeaderName::from_static(X_REQUEST_ID);

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id_header.clone(), UuidRequestId))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request.headers()),
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header));

    Router::new()
        .route("/status", get(routes::get_status))
        .route("/metrics", get(routes::get_metrics))
        .route("/coins", get(routes::get_coins))
        .route("/coin-icon/{coin}", get(routes::get_coin_icon))
        .route("/permissions", get(routes::get_permissions))
        .route("/pair/{from}/{to}", get(routes::get_pair))
        .route("/pairs", post(routes::post_pairs))
        .route("/shifts/bulk", post(routes::post_bulk_shifts))
        .route("/shifts/fixed", post(routes::post_fixed_shift))
        .route("/shifts/variable", post(routes::post_variable_shift))
        .route("/shifts/{id}", get(routes::get_shift))
        .route(
            "/shifts/{id}/set-refund-address",
            post(routes::post_refund_address),
        )
        .route("/recent-shifts", get(routes::get_recent_shifts))
        .route("/xai/stats", get(routes::get_xai_stats))
        .route("/account", get(routes::get_account))
        .route("/quotes", post(routes::post_quote))
        .route("/cancel-order", post(routes::post_cancel_order))
        .route("/checkout", post(routes::post_checkout))
        .route("/checkout/{id}", get(routes::get_checkout))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(middleware)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, RetryConfig};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn server_for(upstream: &MockServer) -> ProxyServer {
        let client_config = ClientConfig::new("test-secret", "test-id")
            .with_base_url(upstream.uri())
            .with_retries(RetryConfig {
                max_retries: 0,
                ..RetryConfig::default()
            });
        let client = SideshiftClient::new(client_config.clone()).unwrap();
        let config = ProxyConfig {
            client: client_config,
            ..ProxyConfig::default()
        };
        ProxyServer::new(config, client, None)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_status_route() {
        let upstream = MockServer::start().await;
        let response = server_for(&upstream)
            .router()
            .oneshot(get_request("/status"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(X_REQUEST_ID));
        let body = json_body(response).await;
        assert_eq!(body["status"], "operational");
    }

    #[tokio::test]
    async fn test_request_id_propagated() {
        let upstream = MockServer::start().await;
        let request = Request::builder()
            .uri("/status")
            .header(X_REQUEST_ID, "req-123")
            .body(Body::empty())
            .unwrap();
        let response = server_for(&upstream).router().oneshot(request).await.unwrap();
        assert_eq!(response.headers().get(X_REQUEST_ID).unwrap(), "req-123");
    }

    #[tokio::test]
    async fn test_coins_passthrough() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "coin": "ETH" }])))
            .mount(&upstream)
            .await;

        let response = server_for(&upstream)
            .router()
            .oneshot(get_request("/coins"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([{ "coin": "ETH" }]));
    }

    #[tokio::test]
    async fn test_read_route_failure_is_500() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shifts/abc"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "error": { "message": "Shift not found" } })),
            )
            .mount(&upstream)
            .await;

        let response = server_for(&upstream)
            .router()
            .oneshot(get_request("/shifts/abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Failed to fetch shift", "details": "Fetch API error: Shift not found" })
        );
    }

    #[tokio::test]
    async fn test_write_route_failure_is_400() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/quotes"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&upstream)
            .await;

        let body = json!({
            "depositCoin": "btc",
            "depositNetwork": "bitcoin",
            "settleCoin": "eth",
            "settleNetwork": "ethereum",
            "depositAmount": 0.1
        });
        let response = server_for(&upstream)
            .router()
            .oneshot(post_request("/quotes", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to request quote");
        assert_eq!(
            body["details"],
            "Fetch API error: HTTP 500 Internal Server Error"
        );
    }

    #[tokio::test]
    async fn test_validation_failure_is_400_on_read_route() {
        let upstream = MockServer::start().await;
        let response = server_for(&upstream)
            .router()
            .oneshot(post_request("/pairs", json!({ "coins": [] })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to fetch pairs");
        assert!(upstream.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_order_route() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cancel-order"))
            .and(header("x-sideshift-secret", "test-secret"))
            .and(body_json(json!({ "orderId": "ord-1" })))
            .respond_with(ResponseTemplate::new(204))
            .mount(&upstream)
            .await;

        let response = server_for(&upstream)
            .router()
            .oneshot(post_request("/cancel-order", json!({ "orderId": "ord-1" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "success": true, "orderId": "ord-1" })
        );
    }

    #[tokio::test]
    async fn test_quote_forwards_user_ip() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/quotes"))
            .and(header("x-user-ip", "203.0.113.7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "q" })))
            .expect(1)
            .mount(&upstream)
            .await;

        let mut request = post_request(
            "/quotes",
            json!({
                "depositCoin": "btc",
                "depositNetwork": "bitcoin",
                "settleCoin": "eth",
                "settleNetwork": "ethereum",
                "settleAmount": 1.5
            }),
        );
        request
            .headers_mut()
            .insert("x-forwarded-for", "203.0.113.7".parse().unwrap());

        let response = server_for(&upstream).router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_coin_icon_content_type() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/icon/eth"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<svg/>", "image/svg+xml"))
            .mount(&upstream)
            .await;

        let response = server_for(&upstream)
            .router()
            .oneshot(get_request("/coin-icon/eth"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "image/svg+xml"
        );
    }

    #[tokio::test]
    async fn test_metrics_disabled() {
        let upstream = MockServer::start().await;
        let response = server_for(&upstream)
            .router()
            .oneshot(get_request("/metrics"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
