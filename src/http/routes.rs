//! Route handlers: one per client method, plus status and metrics.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::types::{
    CheckoutRequest, FixedShiftRequest, QuoteRequest, RefundAddressRequest, VariableShiftRequest,
};
use crate::client::SideshiftClient;
use crate::http::request::forwarded_user_ip;
use crate::http::response::ApiError;

/// Fallback content type for coin icons.
const DEFAULT_ICON_TYPE: &str = "image/svg";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: SideshiftClient,
    pub metrics: Option<PrometheusHandle>,
}

type ApiResult = Result<Json<Value>, ApiError>;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

pub async fn get_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}

// ---- GET ----------------------------------------------------------------

pub async fn get_coins(State(state): State<AppState>) -> ApiResult {
    state
        .client
        .get_coins()
        .await
        .map(Json)
        .map_err(|e| ApiError::read("Failed to fetch coins", e))
}

pub async fn get_coin_icon(
    State(state): State<AppState>,
    Path(coin): Path<String>,
) -> Result<Response, ApiError> {
    let icon = state
        .client
        .get_coin_icon(&coin)
        .await
        .map_err(|e| ApiError::read("Failed to fetch coin icon", e))?;

    let content_type = icon
        .content_type
        .unwrap_or_else(|| DEFAULT_ICON_TYPE.to_string());
    Ok(([(header::CONTENT_TYPE, content_type)], icon.data).into_response())
}

pub async fn get_permissions(State(state): State<AppState>) -> ApiResult {
    state
        .client
        .get_permissions()
        .await
        .map(Json)
        .map_err(|e| ApiError::read("Failed to fetch permissions", e))
}

#[derive(Debug, Default, Deserialize)]
pub struct PairQuery {
    pub amount: Option<f64>,
}

pub async fn get_pair(
    State(state): State<AppState>,
    Path((from, to)): Path<(String, String)>,
    Query(query): Query<PairQuery>,
) -> ApiResult {
    state
        .client
        .get_pair(&from, &to, query.amount)
        .await
        .map(Json)
        .map_err(|e| ApiError::read("Failed to fetch pair info", e))
}

pub async fn get_shift(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .client
        .get_shift(&id)
        .await
        .map(Json)
        .map_err(|e| ApiError::read("Failed to fetch shift", e))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentShiftsQuery {
    pub limit: Option<u32>,
}

pub async fn get_recent_shifts(
    State(state): State<AppState>,
    Query(query): Query<RecentShiftsQuery>,
) -> ApiResult {
    state
        .client
        .get_recent_shifts(query.limit)
        .await
        .map(Json)
        .map_err(|e| ApiError::read("Failed to fetch recent shifts", e))
}

pub async fn get_xai_stats(State(state): State<AppState>) -> ApiResult {
    state
        .client
        .get_xai_stats()
        .await
        .map(Json)
        .map_err(|e| ApiError::read("Failed to fetch XAI stats", e))
}

pub async fn get_account(State(state): State<AppState>) -> ApiResult {
    state
        .client
        .get_account()
        .await
        .map(Json)
        .map_err(|e| ApiError::read("Failed to fetch account", e))
}

pub async fn get_checkout(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .client
        .get_checkout(&id)
        .await
        .map(Json)
        .map_err(|e| ApiError::read("Failed to fetch checkout", e))
}

// ---- POST ---------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PairsBody {
    pub coins: Vec<String>,
}

pub async fn post_pairs(State(state): State<AppState>, Json(body): Json<PairsBody>) -> ApiResult {
    state
        .client
        .get_pairs(&body.coins)
        .await
        .map(Json)
        .map_err(|e| ApiError::read("Failed to fetch pairs", e))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BulkShiftsBody {
    pub ids: Vec<String>,
}

pub async fn post_bulk_shifts(
    State(state): State<AppState>,
    Json(body): Json<BulkShiftsBody>,
) -> ApiResult {
    state
        .client
        .get_bulk_shifts(&body.ids)
        .await
        .map(Json)
        .map_err(|e| ApiError::read("Failed to fetch bulk shifts", e))
}

pub async fn post_quote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut request): Json<QuoteRequest>,
) -> ApiResult {
    request.user_ip = request.user_ip.or_else(|| forwarded_user_ip(&headers));
    state
        .client
        .request_quote(&request)
        .await
        .map(Json)
        .map_err(|e| ApiError::write("Failed to request quote", e))
}

pub async fn post_fixed_shift(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut request): Json<FixedShiftRequest>,
) -> ApiResult {
    request.user_ip = request.user_ip.or_else(|| forwarded_user_ip(&headers));
    state
        .client
        .create_fixed_shift(&request)
        .await
        .map(Json)
        .map_err(|e| ApiError::write("Failed to create fixed shift", e))
}

pub async fn post_variable_shift(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut request): Json<VariableShiftRequest>,
) -> ApiResult {
    request.user_ip = request.user_ip.or_else(|| forwarded_user_ip(&headers));
    state
        .client
        .create_variable_shift(&request)
        .await
        .map(Json)
        .map_err(|e| ApiError::write("Failed to create variable shift", e))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefundAddressBody {
    pub refund_address: String,
    pub refund_memo: Option<String>,
}

pub async fn post_refund_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RefundAddressBody>,
) -> ApiResult {
    let request = RefundAddressRequest {
        shift_id: id,
        refund_address: body.refund_address,
        refund_memo: body.refund_memo,
    };
    state
        .client
        .set_refund_address(&request)
        .await
        .map(Json)
        .map_err(|e| ApiError::write("Failed to set refund address", e))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CancelOrderBody {
    pub order_id: String,
}

pub async fn post_cancel_order(
    State(state): State<AppState>,
    Json(body): Json<CancelOrderBody>,
) -> ApiResult {
    state
        .client
        .cancel_order(&body.order_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::write("Failed to cancel order", e))
}

pub async fn post_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut request): Json<CheckoutRequest>,
) -> ApiResult {
    request.user_ip = request.user_ip.or_else(|| forwarded_user_ip(&headers));
    state
        .client
        .create_checkout(&request)
        .await
        .map(Json)
        .map_err(|e| ApiError::write("Failed to create checkout", e))
}
