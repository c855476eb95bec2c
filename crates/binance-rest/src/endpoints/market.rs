//! General and market data endpoints
//!
//! All public except `historicalTrades`, which needs an API key.

use serde_json::Value;
use tracing::instrument;

use super::{EndpointSpec, HttpMethod};
use crate::client::BinanceRestClient;
use crate::error::{RestError, RestResult};
use crate::request::{Classification, Params};

pub const PING: EndpointSpec =
    EndpointSpec::new("ping", HttpMethod::Get, "/api/v3/ping", Classification::Public);
pub const SERVER_TIME: EndpointSpec =
    EndpointSpec::new("server_time", HttpMethod::Get, "/api/v3/time", Classification::Public);
pub const EXCHANGE_INFO: EndpointSpec = EndpointSpec::new(
    "exchange_info",
    HttpMethod::Get,
    "/api/v3/exchangeInfo",
    Classification::Public,
);
pub const ORDER_BOOK: EndpointSpec =
    EndpointSpec::new("order_book", HttpMethod::Get, "/api/v3/depth", Classification::Public);
pub const RECENT_TRADES: EndpointSpec =
    EndpointSpec::new("recent_trades", HttpMethod::Get, "/api/v3/trades", Classification::Public);
pub const HISTORICAL_TRADES: EndpointSpec = EndpointSpec::new(
    "historical_trades",
    HttpMethod::Get,
    "/api/v3/historicalTrades",
    Classification::ApiKeyOnly,
);
pub const AGG_TRADES: EndpointSpec =
    EndpointSpec::new("agg_trades", HttpMethod::Get, "/api/v3/aggTrades", Classification::Public);
pub const KLINES: EndpointSpec =
    EndpointSpec::new("klines", HttpMethod::Get, "/api/v3/klines", Classification::Public);
pub const TICKER_24HR: EndpointSpec = EndpointSpec::new(
    "ticker_24hr",
    HttpMethod::Get,
    "/api/v3/ticker/24hr",
    Classification::Public,
);
pub const TICKER_PRICE: EndpointSpec = EndpointSpec::new(
    "ticker_price",
    HttpMethod::Get,
    "/api/v3/ticker/price",
    Classification::Public,
);
pub const BOOK_TICKER: EndpointSpec = EndpointSpec::new(
    "book_ticker",
    HttpMethod::Get,
    "/api/v3/ticker/bookTicker",
    Classification::Public,
);

/// General and market data endpoints
pub struct MarketEndpoints<'a> {
    client: &'a BinanceRestClient,
}

impl<'a> MarketEndpoints<'a> {
    pub fn new(client: &'a BinanceRestClient) -> Self {
        Self { client }
    }

    /// Test connectivity
    #[instrument(skip(self))]
    pub async fn ping(&self) -> RestResult<()> {
        self.client.call::<Value>(&PING, Params::new()).await?;
        Ok(())
    }

    /// Exchange server time in milliseconds
    #[instrument(skip(self))]
    pub async fn server_time(&self) -> RestResult<i64> {
        let response: Value = self.client.call(&SERVER_TIME, Params::new()).await?;
        response
            .get("serverTime")
            .and_then(Value::as_i64)
            .ok_or_else(|| RestError::Parse("missing serverTime".to_string()))
    }

    /// Trading rules and symbol information
    #[instrument(skip(self))]
    pub async fn exchange_info(&self) -> RestResult<Value> {
        self.client.call(&EXCHANGE_INFO, Params::new()).await
    }

    /// Order book depth
    ///
    /// # Arguments
    /// * `symbol` - Trading pair (e.g., "BTCUSDT")
    /// * `limit` - Number of levels (default 100, max 5000)
    #[instrument(skip(self))]
    pub async fn order_book(&self, symbol: &str, limit: Option<u16>) -> RestResult<Value> {
        let params = Params::new().with("symbol", symbol).with_opt("limit", limit);
        self.client.call(&ORDER_BOOK, params).await
    }

    /// Most recent trades
    #[instrument(skip(self))]
    pub async fn recent_trades(&self, symbol: &str, limit: Option<u16>) -> RestResult<Value> {
        let params = Params::new().with("symbol", symbol).with_opt("limit", limit);
        self.client.call(&RECENT_TRADES, params).await
    }

    /// Older trades, starting at `from_id` (requires API key)
    #[instrument(skip(self))]
    pub async fn historical_trades(
        &self,
        symbol: &str,
        limit: Option<u16>,
        from_id: Option<u64>,
    ) -> RestResult<Value> {
        let params = Params::new()
            .with("symbol", symbol)
            .with_opt("limit", limit)
            .with_opt("fromId", from_id);
        self.client.call(&HISTORICAL_TRADES, params).await
    }

    /// Compressed, aggregate trades
    #[instrument(skip(self))]
    pub async fn agg_trades(
        &self,
        symbol: &str,
        from_id: Option<u64>,
        limit: Option<u16>,
        start_time: Option<i64>,
        end_time: Option<i64>,
    ) -> RestResult<Value> {
        let params = Params::new()
            .with("symbol", symbol)
            .with_opt("fromId", from_id)
            .with_opt("limit", limit)
            .with_opt("startTime", start_time)
            .with_opt("endTime", end_time);
        self.client.call(&AGG_TRADES, params).await
    }

    /// Candlestick bars
    ///
    /// # Arguments
    /// * `interval` - Exchange interval code ("1m", "1h", "1d", ...)
    #[instrument(skip(self))]
    pub async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: Option<u16>,
        start_time: Option<i64>,
        end_time: Option<i64>,
    ) -> RestResult<Value> {
        let params = Params::new()
            .with("symbol", symbol)
            .with("interval", interval)
            .with_opt("limit", limit)
            .with_opt("startTime", start_time)
            .with_opt("endTime", end_time);
        self.client.call(&KLINES, params).await
    }

    /// 24 hour price change statistics; all symbols if `symbol` is `None`
    #[instrument(skip(self))]
    pub async fn ticker_24hr(&self, symbol: Option<&str>) -> RestResult<Value> {
        let params = Params::new().with_opt("symbol", symbol);
        self.client.call(&TICKER_24HR, params).await
    }

    /// Latest price; all symbols if `symbol` is `None`
    #[instrument(skip(self))]
    pub async fn ticker_price(&self, symbol: Option<&str>) -> RestResult<Value> {
        let params = Params::new().with_opt("symbol", symbol);
        self.client.call(&TICKER_PRICE, params).await
    }

    /// Best bid/ask; all symbols if `symbol` is `None`
    #[instrument(skip(self))]
    pub async fn book_ticker(&self, symbol: Option<&str>) -> RestResult<Value> {
        let params = Params::new().with_opt("symbol", symbol);
        self.client.call(&BOOK_TICKER, params).await
    }
}
