//! Request parameters of the POST endpoints.
//!
//! Field names follow the API's camelCase so the proxy can deserialize
//! incoming bodies straight into these types. `user_ip` is forwarded as the
//! `x-user-ip` header and never serialized into a body.

use serde::{Deserialize, Serialize};

/// Parameters of `POST /quotes`. Exactly one amount is normally set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteRequest {
    pub deposit_coin: String,
    pub deposit_network: String,
    pub settle_coin: String,
    pub settle_network: String,
    pub deposit_amount: Option<f64>,
    pub settle_amount: Option<f64>,
    #[serde(skip_serializing)]
    pub user_ip: Option<String>,
}

/// Parameters of `POST /shifts/fixed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixedShiftRequest {
    pub settle_address: String,
    pub quote_id: String,
    pub settle_memo: Option<String>,
    pub refund_address: Option<String>,
    pub refund_memo: Option<String>,
    #[serde(skip_serializing)]
    pub user_ip: Option<String>,
}

/// Parameters of `POST /shifts/variable`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariableShiftRequest {
    pub settle_address: String,
    pub settle_coin: String,
    pub settle_network: String,
    pub deposit_coin: String,
    pub deposit_network: String,
    pub refund_address: Option<String>,
    pub settle_memo: Option<String>,
    pub refund_memo: Option<String>,
    #[serde(skip_serializing)]
    pub user_ip: Option<String>,
}

/// Parameters of `POST /shifts/{id}/set-refund-address`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefundAddressRequest {
    pub shift_id: String,
    pub refund_address: String,
    pub refund_memo: Option<String>,
}

/// Parameters of `POST /checkout`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutRequest {
    pub settle_coin: String,
    pub settle_network: String,
    pub settle_amount: f64,
    pub settle_address: String,
    pub success_url: String,
    pub cancel_url: String,
    pub settle_memo: Option<String>,
    #[serde(skip_serializing)]
    pub user_ip: Option<String>,
}
