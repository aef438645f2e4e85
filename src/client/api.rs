//! Endpoint methods of the SideShift v2 API.
//!
//! Each method validates its arguments, builds the URL, headers and body,
//! then hands the call to the [`RequestEngine`]. Validation messages name the
//! API method (`getPair`, `requestQuote`, ...) so they read the same across
//! client libraries.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use url::Url;

use crate::client::engine::RequestEngine;
use crate::client::headers::{
    base_headers, commission_headers, image_headers, token_headers, user_ip_headers, HeaderSet,
};
use crate::client::transport::{
    endpoint_url, BinaryPayload, ReqwestTransport, RequestOptions, Transport,
};
use crate::client::types::{
    CheckoutRequest, FixedShiftRequest, QuoteRequest, RefundAddressRequest, VariableShiftRequest,
};
use crate::client::validation::{optional_string, validate_array, validate_number, validate_string};
use crate::config::validation::validate_client_config;
use crate::config::{ClientConfig, ConfigError, ValidationError};
use crate::error::Result;

/// Upper bound accepted by `/recent-shifts`.
const MAX_RECENT_SHIFTS: u32 = 100;

/// Client for the SideShift v2 REST API. Cheap to clone.
#[derive(Clone)]
pub struct SideshiftClient {
    config: Arc<ClientConfig>,
    engine: Arc<RequestEngine>,
    base: Url,
}

impl SideshiftClient {
    /// Validate `config` and build a client backed by reqwest.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new()?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Validate `config` and build a client on top of `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        validate_client_config(&config).map_err(ConfigError::Validation)?;
        let base = Url::parse(&config.base_url).map_err(|e| {
            ConfigError::Validation(vec![ValidationError::new("base_url", e.to_string())])
        })?;

        let config = Arc::new(config);
        let engine = RequestEngine::new(config.clone(), transport)
            .with_cancel_order_url(endpoint_url(&base, &["cancel-order"], &[]));

        Ok(Self {
            config,
            engine: Arc::new(engine),
            base,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn engine(&self) -> &RequestEngine {
        &self.engine
    }

    fn affiliate_id(&self) -> String {
        self.config.account_id.clone()
    }

    async fn get(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        headers: HeaderSet,
    ) -> Result<Value> {
        let url = endpoint_url(&self.base, segments, query);
        Ok(self
            .engine
            .request_json(&url, RequestOptions::get(headers))
            .await?)
    }

    async fn post(&self, segments: &[&str], headers: HeaderSet, body: Value) -> Result<Value> {
        let url = endpoint_url(&self.base, segments, &[]);
        Ok(self
            .engine
            .request_json(&url, RequestOptions::post(headers, body.to_string()))
            .await?)
    }

    // ---- GET -------------------------------------------------------------

    /// Supported coins and networks.
    pub async fn get_coins(&self) -> Result<Value> {
        self.get(&["coins"], &[], base_headers()).await
    }

    /// Icon of `coin`, usually SVG.
    pub async fn get_coin_icon(&self, coin: &str) -> Result<BinaryPayload> {
        let coin = validate_string(coin, "coin", "getCoinIcon")?;
        let url = endpoint_url(&self.base, &["coins", "icon", &coin], &[]);
        Ok(self
            .engine
            .request_binary(&url, RequestOptions::get(image_headers()))
            .await?)
    }

    pub async fn get_permissions(&self) -> Result<Value> {
        self.get(&["permissions"], &[], base_headers()).await
    }

    /// Rate and limits for one pair. A zero amount is treated as absent.
    pub async fn get_pair(&self, from: &str, to: &str, amount: Option<f64>) -> Result<Value> {
        let from = validate_string(from, "from", "getPair")?;
        let to = validate_string(to, "to", "getPair")?;
        let amount = match amount.filter(|a| *a != 0.0) {
            Some(a) => Some(validate_number(a, "amount", "getPair")?),
            None => None,
        };

        let mut query = vec![("affiliateId", self.affiliate_id())];
        if let Some(amount) = amount {
            query.push(("amount", amount.to_string()));
        }
        self.get(&["pair", &from, &to, ""], &query, commission_headers(&self.config))
            .await
    }

    /// Rates for several coins at once, e.g. `["btc-mainnet", "usdc-bsc"]`.
    pub async fn get_pairs<S: AsRef<str>>(&self, coins: &[S]) -> Result<Value> {
        let coins = validate_array(coins, "arrayOfCoins", "getPairs")?;
        let query = [
            ("pairs", coins.join(",")),
            ("affiliateId", self.affiliate_id()),
        ];
        self.get(&["pairs"], &query, commission_headers(&self.config))
            .await
    }

    pub async fn get_shift(&self, shift_id: &str) -> Result<Value> {
        let shift_id = validate_string(shift_id, "shiftId", "getShift")?;
        self.get(&["shifts", &shift_id], &[], base_headers()).await
    }

    pub async fn get_bulk_shifts<S: AsRef<str>>(&self, ids: &[S]) -> Result<Value> {
        let ids = validate_array(ids, "arrayOfIds", "getBulkShifts")?;
        self.get(&["shifts"], &[("ids", ids.join(","))], base_headers())
            .await
    }

    /// Latest public shifts. `limit` is clamped to `1..=100`; `None` or `0`
    /// leaves the choice to the service.
    pub async fn get_recent_shifts(&self, limit: Option<u32>) -> Result<Value> {
        match limit.filter(|l| *l > 0) {
            Some(limit) => {
                let limit = limit.clamp(1, MAX_RECENT_SHIFTS);
                self.get(&["recent-shifts"], &[("limit", limit.to_string())], base_headers())
                    .await
            }
            None => self.get(&["recent-shifts"], &[], base_headers()).await,
        }
    }

    pub async fn get_xai_stats(&self) -> Result<Value> {
        self.get(&["xai", "stats"], &[], base_headers()).await
    }

    pub async fn get_account(&self) -> Result<Value> {
        self.get(&["account"], &[], token_headers(&self.config)).await
    }

    pub async fn get_checkout(&self, checkout_id: &str) -> Result<Value> {
        let checkout_id = validate_string(checkout_id, "checkoutId", "getCheckout")?;
        self.get(&["checkout", &checkout_id], &[], token_headers(&self.config))
            .await
    }

    // ---- POST ------------------------------------------------------------

    pub async fn request_quote(&self, request: &QuoteRequest) -> Result<Value> {
        const SOURCE: &str = "requestQuote";
        let mut body = Map::new();
        body.insert(
            "depositCoin".into(),
            validate_string(&request.deposit_coin, "depositCoin", SOURCE)?.into(),
        );
        body.insert(
            "depositNetwork".into(),
            validate_string(&request.deposit_network, "depositNetwork", SOURCE)?.into(),
        );
        body.insert(
            "settleCoin".into(),
            validate_string(&request.settle_coin, "settleCoin", SOURCE)?.into(),
        );
        body.insert(
            "settleNetwork".into(),
            validate_string(&request.settle_network, "settleNetwork", SOURCE)?.into(),
        );
        if let Some(amount) = request.deposit_amount {
            body.insert(
                "depositAmount".into(),
                json!(validate_number(amount, "depositAmount", SOURCE)?),
            );
        }
        if let Some(amount) = request.settle_amount {
            body.insert(
                "settleAmount".into(),
                json!(validate_number(amount, "settleAmount", SOURCE)?),
            );
        }
        body.insert("affiliateId".into(), self.affiliate_id().into());

        let headers = user_ip_headers(&self.config, request.user_ip.as_deref());
        self.post(&["quotes"], headers, Value::Object(body)).await
    }

    pub async fn create_fixed_shift(&self, request: &FixedShiftRequest) -> Result<Value> {
        const SOURCE: &str = "createFixedShift";
        let settle_address = validate_string(&request.settle_address, "settleAddress", SOURCE)?;
        let quote_id = validate_string(&request.quote_id, "quoteId", SOURCE)?;

        let mut body = Map::new();
        body.insert("settleAddress".into(), settle_address.into());
        body.insert("affiliateId".into(), self.affiliate_id().into());
        body.insert("quoteId".into(), quote_id.into());
        insert_optional(&mut body, "settleMemo", request.settle_memo.as_deref());
        insert_optional(&mut body, "refundAddress", request.refund_address.as_deref());
        insert_optional(&mut body, "refundMemo", request.refund_memo.as_deref());

        let headers = user_ip_headers(&self.config, request.user_ip.as_deref());
        self.post(&["shifts", "fixed"], headers, Value::Object(body))
            .await
    }

    pub async fn create_variable_shift(&self, request: &VariableShiftRequest) -> Result<Value> {
        const SOURCE: &str = "createVariableShift";
        let mut body = Map::new();
        body.insert(
            "settleAddress".into(),
            validate_string(&request.settle_address, "settleAddress", SOURCE)?.into(),
        );
        body.insert(
            "settleCoin".into(),
            validate_string(&request.settle_coin, "settleCoin", SOURCE)?.into(),
        );
        body.insert(
            "settleNetwork".into(),
            validate_string(&request.settle_network, "settleNetwork", SOURCE)?.into(),
        );
        body.insert(
            "depositCoin".into(),
            validate_string(&request.deposit_coin, "depositCoin", SOURCE)?.into(),
        );
        body.insert(
            "depositNetwork".into(),
            validate_string(&request.deposit_network, "depositNetwork", SOURCE)?.into(),
        );
        body.insert("affiliateId".into(), self.affiliate_id().into());
        insert_optional(&mut body, "settleMemo", request.settle_memo.as_deref());
        insert_optional(&mut body, "refundAddress", request.refund_address.as_deref());
        insert_optional(&mut body, "refundMemo", request.refund_memo.as_deref());

        let headers = user_ip_headers(&self.config, request.user_ip.as_deref());
        self.post(&["shifts", "variable"], headers, Value::Object(body))
            .await
    }

    pub async fn set_refund_address(&self, request: &RefundAddressRequest) -> Result<Value> {
        const SOURCE: &str = "setRefundAddress";
        let shift_id = validate_string(&request.shift_id, "shiftId", SOURCE)?;
        let address = validate_string(&request.refund_address, "refundAddress", SOURCE)?;

        let mut body = Map::new();
        body.insert("address".into(), address.into());
        insert_optional(&mut body, "memo", request.refund_memo.as_deref());

        self.post(
            &["shifts", &shift_id, "set-refund-address"],
            token_headers(&self.config),
            Value::Object(body),
        )
        .await
    }

    /// Cancel an order. A `204 No Content` answer yields
    /// `{"success": true, "orderId": <id>}`.
    pub async fn cancel_order(&self, order_id: &str) -> Result<Value> {
        let order_id = validate_string(order_id, "orderId", "cancelOrder")?;
        self.post(
            &["cancel-order"],
            token_headers(&self.config),
            json!({ "orderId": order_id }),
        )
        .await
    }

    pub async fn create_checkout(&self, request: &CheckoutRequest) -> Result<Value> {
        const SOURCE: &str = "createCheckout";
        let mut body = Map::new();
        body.insert(
            "settleCoin".into(),
            validate_string(&request.settle_coin, "settleCoin", SOURCE)?.into(),
        );
        body.insert(
            "settleNetwork".into(),
            validate_string(&request.settle_network, "settleNetwork", SOURCE)?.into(),
        );
        body.insert(
            "settleAmount".into(),
            json!(validate_number(request.settle_amount, "settleAmount", SOURCE)?),
        );
        body.insert(
            "settleAddress".into(),
            validate_string(&request.settle_address, "settleAddress", SOURCE)?.into(),
        );
        body.insert(
            "successUrl".into(),
            validate_string(&request.success_url, "successUrl", SOURCE)?.into(),
        );
        body.insert(
            "cancelUrl".into(),
            validate_string(&request.cancel_url, "cancelUrl", SOURCE)?.into(),
        );
        body.insert("affiliateId".into(), self.affiliate_id().into());
        insert_optional(&mut body, "settleMemo", request.settle_memo.as_deref());

        let headers = user_ip_headers(&self.config, request.user_ip.as_deref());
        self.post(&["checkout"], headers, Value::Object(body)).await
    }
}

/// Add `key` only when `value` is non-blank.
fn insert_optional(body: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = optional_string(value) {
        body.insert(key.to_string(), Value::String(value));
    }
}
