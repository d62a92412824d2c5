use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::config::{ClientConfig, Credentials};
use crate::enums::KlineInterval;
use crate::error::{MexcError, Result};
use crate::logging::{BoundaryLogger, TraceContext, Timer};
use crate::models::*;
use crate::order::NewOrder;
use crate::signature;

const API_KEY_HEADER: &str = "X-MEXC-APIKEY";

pub const DEFAULT_DEPTH_LIMIT: u32 = 100;
pub const MAX_DEPTH_LIMIT: u32 = 5000;
pub const DEFAULT_TRADES_LIMIT: u32 = 500;
pub const MAX_TRADES_LIMIT: u32 = 1000;
pub const DEFAULT_KLINES_LIMIT: u32 = 500;
pub const MAX_KLINES_LIMIT: u32 = 1000;
pub const MAX_CANCEL_SYMBOLS: usize = 5;

/// Candlestick query for [`MexcClient::klines`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineQuery {
    pub symbol: String,
    pub interval: KlineInterval,
    /// Milliseconds; omitted from the request unless > 0.
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub limit: Option<u32>,
}

impl KlineQuery {
    pub fn new(symbol: impl Into<String>, interval: KlineInterval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            start_time: None,
            end_time: None,
            limit: None,
        }
    }

    pub fn start_time(mut self, start_time: i64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn end_time(mut self, end_time: i64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// MEXC spot REST client
#[derive(Clone)]
pub struct MexcClient {
    client: Client,
    config: ClientConfig,
    clock: Arc<dyn Clock>,
    logger: BoundaryLogger,
}

impl MexcClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("mexc-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config,
            clock: Arc::new(SystemClock),
            logger: BoundaryLogger::default(),
        })
    }

    /// Replace the timestamp source used for signed requests
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // Market data
    // =========================================================================

    /// `true` when `/api/v3/ping` answers with an empty object
    pub async fn check_connection(&self) -> Result<bool> {
        let body: serde_json::Value = self.public_get("/api/v3/ping", &[], false).await?;
        Ok(body.as_object().is_some_and(|obj| obj.is_empty()))
    }

    pub async fn server_time(&self) -> Result<ServerTime> {
        self.public_get("/api/v3/time", &[], false).await
    }

    pub async fn exchange_info(&self) -> Result<ExchangeInfo> {
        self.public_get("/api/v3/exchangeInfo", &[], false).await
    }

    /// Order book of a symbol. `limit` defaults to 100, max 5000.
    pub async fn order_book(&self, symbol: &str, limit: Option<u32>) -> Result<OrderBook> {
        check_symbol(symbol)?;
        let limit = check_limit(limit, DEFAULT_DEPTH_LIMIT, MAX_DEPTH_LIMIT)?;

        let params = [("symbol", symbol.to_string()), ("limit", limit.to_string())];
        self.public_get("/api/v3/depth", &params, false).await
    }

    /// Latest trades of a symbol. `limit` defaults to 500, max 1000.
    pub async fn recent_trades(&self, symbol: &str, limit: Option<u32>) -> Result<Vec<Trade>> {
        check_symbol(symbol)?;
        let limit = check_limit(limit, DEFAULT_TRADES_LIMIT, MAX_TRADES_LIMIT)?;

        let params = [("symbol", symbol.to_string()), ("limit", limit.to_string())];
        self.public_get("/api/v3/trades", &params, false).await
    }

    /// Older trades of a symbol. Sends the API key when one is configured.
    pub async fn historical_trades(&self, symbol: &str, limit: Option<u32>) -> Result<Vec<Trade>> {
        check_symbol(symbol)?;
        let limit = check_limit(limit, DEFAULT_TRADES_LIMIT, MAX_TRADES_LIMIT)?;

        let params = [("symbol", symbol.to_string()), ("limit", limit.to_string())];
        self.public_get("/api/v3/historicalTrades", &params, true).await
    }

    pub async fn klines(&self, query: &KlineQuery) -> Result<Vec<Kline>> {
        check_symbol(&query.symbol)?;
        let limit = check_limit(query.limit, DEFAULT_KLINES_LIMIT, MAX_KLINES_LIMIT)?;

        let mut params = vec![
            ("symbol", query.symbol.clone()),
            ("interval", query.interval.as_str().to_string()),
        ];
        if let Some(start_time) = query.start_time.filter(|t| *t > 0) {
            params.push(("startTime", start_time.to_string()));
        }
        if let Some(end_time) = query.end_time.filter(|t| *t > 0) {
            params.push(("endTime", end_time.to_string()));
        }
        params.push(("limit", limit.to_string()));

        self.public_get("/api/v3/klines", &params, false).await
    }

    pub async fn average_price(&self, symbol: &str) -> Result<AveragePrice> {
        check_symbol(symbol)?;

        let params = [("symbol", symbol.to_string())];
        self.public_get("/api/v3/avgPrice", &params, false).await
    }

    // =========================================================================
    // Trading (signed)
    // =========================================================================

    /// Validate an order against the matching engine without placing it
    pub async fn test_order(&self, order: &NewOrder) -> Result<OrderAck> {
        self.submit_order("/api/v3/order/test", order).await
    }

    pub async fn place_order(&self, order: &NewOrder) -> Result<OrderAck> {
        info!(
            "Placing {} {} order on {}",
            order.side, order.order_type, order.symbol
        );
        self.submit_order("/api/v3/order", order).await
    }

    pub async fn cancel_order(&self, symbol: &str, order_id: &str) -> Result<CancelledOrder> {
        check_symbol(symbol)?;
        if order_id.trim().is_empty() {
            return Err(MexcError::InvalidParameter("orderId must not be empty".to_string()));
        }

        let params = vec![
            ("symbol", symbol.to_string()),
            ("orderId", order_id.to_string()),
            ("timestamp", self.clock.now_millis().to_string()),
        ];
        self.signed(Method::DELETE, "/api/v3/order", params).await
    }

    /// Cancel every open order on up to five symbols
    pub async fn cancel_open_orders<S: AsRef<str>>(&self, symbols: &[S]) -> Result<Vec<CancelledOrder>> {
        if symbols.is_empty() {
            return Err(MexcError::InvalidParameter("at least one symbol is required".to_string()));
        }
        if symbols.len() > MAX_CANCEL_SYMBOLS {
            return Err(MexcError::TooManySymbols(symbols.len()));
        }
        for symbol in symbols {
            check_symbol(symbol.as_ref())?;
        }

        let joined = symbols
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(",");

        let params = vec![
            ("symbol", joined),
            ("timestamp", self.clock.now_millis().to_string()),
        ];
        self.signed(Method::DELETE, "/api/v3/openOrders", params).await
    }

    // =========================================================================
    // Account (signed)
    // =========================================================================

    pub async fn account_info(&self) -> Result<AccountInfo> {
        let params = vec![("timestamp", self.clock.now_millis().to_string())];
        self.signed(Method::GET, "/api/v3/account", params).await
    }

    pub async fn balances(&self) -> Result<Vec<Balance>> {
        Ok(self.account_info().await?.balances)
    }

    /// Balance of a single asset, e.g. `USDT`
    pub async fn balance(&self, asset: &str) -> Result<Balance> {
        self.balances()
            .await?
            .into_iter()
            .find(|b| b.asset == asset)
            .ok_or_else(|| MexcError::AssetNotFound(asset.to_string()))
    }

    // =========================================================================
    // Private helpers
    // =========================================================================

    async fn submit_order(&self, path: &str, order: &NewOrder) -> Result<OrderAck> {
        order.validate()?;

        let params = order.query_pairs(self.config.recv_window, self.clock.now_millis());
        self.signed(Method::POST, path, params).await
    }

    fn credentials(&self) -> Result<&Credentials> {
        self.config.credentials.as_ref().ok_or(MexcError::MissingCredentials)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", self.config.base_url, path))
            .map_err(|e| MexcError::Url(format!("{}{}: {}", self.config.base_url, path, e)))
    }

    async fn public_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        with_api_key: bool,
    ) -> Result<T> {
        let mut url = self.endpoint(path)?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let mut request = self.client.get(url);
        if with_api_key {
            if let Some(credentials) = &self.config.credentials {
                request = request.header(API_KEY_HEADER, &credentials.api_key);
            }
        }

        self.send(Method::GET, path, request).await
    }

    /// Signed request: params go to the query string in order, the query is
    /// signed as sent, and `signature` is appended last.
    async fn signed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Vec<(&str, String)>,
    ) -> Result<T> {
        let credentials = self.credentials()?;
        let mut url = self.endpoint(path)?;

        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));

        let payload = url.query().unwrap_or_default().to_string();
        let signature = signature::sign(credentials.api_secret.as_bytes(), payload.as_bytes())?;
        url.query_pairs_mut().append_pair("signature", &signature);

        let request = self
            .client
            .request(method.clone(), url)
            .header(API_KEY_HEADER, &credentials.api_key)
            .header(CONTENT_TYPE, "application/json");

        self.send(method, path, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let trace_id = TraceContext::new_trace_id();
        let timer = Timer::start();

        self.logger.external_call(&trace_id, method.as_str(), path);

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                self.logger
                    .external_error(&trace_id, method.as_str(), path, timer.elapsed_ms(), &e);
                return Err(MexcError::Http(e));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                self.logger
                    .external_error(&trace_id, method.as_str(), path, timer.elapsed_ms(), &e);
                return Err(MexcError::Http(e));
            }
        };

        if !status.is_success() {
            let error = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(api) => MexcError::Api {
                    status: status.as_u16(),
                    code: api.code,
                    msg: api.msg,
                },
                Err(_) => MexcError::Status {
                    status: status.as_u16(),
                    body,
                },
            };
            self.logger
                .external_error(&trace_id, method.as_str(), path, timer.elapsed_ms(), &error);
            return Err(error);
        }

        self.logger
            .external_done(&trace_id, method.as_str(), path, timer.elapsed_ms(), status.as_u16());

        serde_json::from_str(&body).map_err(|e| {
            self.logger
                .external_error(&trace_id, method.as_str(), path, timer.elapsed_ms(), &e);
            MexcError::Decode(e)
        })
    }
}

fn check_symbol(symbol: &str) -> Result<()> {
    if symbol.trim().is_empty() {
        return Err(MexcError::InvalidParameter("symbol must not be empty".to_string()));
    }
    Ok(())
}

fn check_limit(limit: Option<u32>, default: u32, max: u32) -> Result<u32> {
    match limit {
        None => Ok(default),
        Some(l) if (1..=max).contains(&l) => Ok(l),
        Some(l) => Err(MexcError::InvalidParameter(format!(
            "limit must be between 1 and {}, got {}",
            max, l
        ))),
    }
}
