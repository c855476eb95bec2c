//! Isolated margin endpoints
//!
//! Orders, loans and queries against one isolated margin pair. Every call
//! carries `isIsolated=TRUE` and is signed.

use serde_json::Value;
use tracing::instrument;

use super::account::OrderRef;
use super::{EndpointSpec, HttpMethod};
use crate::client::BinanceRestClient;
use crate::error::RestResult;
use crate::request::{Classification, Params};

pub const ISOLATED_CREATE_ACCOUNT: EndpointSpec = EndpointSpec::new(
    "isolated_create_account",
    HttpMethod::Post,
    "/sapi/v1/margin/isolated/create",
    Classification::Signed,
);
pub const ISOLATED_ACCOUNT: EndpointSpec = EndpointSpec::new(
    "isolated_account",
    HttpMethod::Get,
    "/sapi/v1/margin/isolated/account",
    Classification::Signed,
);
pub const ISOLATED_PAIR: EndpointSpec = EndpointSpec::new(
    "isolated_pair",
    HttpMethod::Get,
    "/sapi/v1/margin/isolated/pair",
    Classification::Signed,
);
pub const ISOLATED_ALL_PAIRS: EndpointSpec = EndpointSpec::new(
    "isolated_all_pairs",
    HttpMethod::Get,
    "/sapi/v1/margin/isolated/allPairs",
    Classification::Signed,
);
pub const ISOLATED_TRANSFER: EndpointSpec = EndpointSpec::new(
    "isolated_transfer",
    HttpMethod::Post,
    "/sapi/v1/margin/isolated/transfer",
    Classification::Signed,
);
pub const NEW_ORDER: EndpointSpec = EndpointSpec::new(
    "margin_new_order",
    HttpMethod::Post,
    "/sapi/v1/margin/order",
    Classification::Signed,
);
pub const CANCEL_ORDER: EndpointSpec = EndpointSpec::new(
    "margin_cancel_order",
    HttpMethod::Delete,
    "/sapi/v1/margin/order",
    Classification::Signed,
);
pub const QUERY_ORDER: EndpointSpec = EndpointSpec::new(
    "margin_query_order",
    HttpMethod::Get,
    "/sapi/v1/margin/order",
    Classification::Signed,
);
pub const OPEN_ORDERS: EndpointSpec = EndpointSpec::new(
    "margin_open_orders",
    HttpMethod::Get,
    "/sapi/v1/margin/openOrders",
    Classification::Signed,
);
pub const MY_TRADES: EndpointSpec = EndpointSpec::new(
    "margin_my_trades",
    HttpMethod::Get,
    "/sapi/v1/margin/myTrades",
    Classification::Signed,
);
pub const BORROW: EndpointSpec = EndpointSpec::new(
    "margin_borrow",
    HttpMethod::Post,
    "/sapi/v1/margin/loan",
    Classification::Signed,
);
pub const REPAY: EndpointSpec = EndpointSpec::new(
    "margin_repay",
    HttpMethod::Post,
    "/sapi/v1/margin/repay",
    Classification::Signed,
);

/// Isolated margin endpoints
pub struct MarginEndpoints<'a> {
    client: &'a BinanceRestClient,
}

impl<'a> MarginEndpoints<'a> {
    pub fn new(client: &'a BinanceRestClient) -> Self {
        Self { client }
    }

    fn isolated(symbol: &str) -> Params {
        Params::new()
            .with("symbol", symbol)
            .with("isIsolated", "TRUE")
    }

    /// Enable an isolated margin account for `base`/`quote`
    #[instrument(skip(self))]
    pub async fn create_account(&self, base: &str, quote: &str) -> RestResult<Value> {
        let params = Params::new().with("base", base).with("quote", quote);
        let params = self.client.timestamped(params);
        self.client.call(&ISOLATED_CREATE_ACCOUNT, params).await
    }

    /// Isolated margin account details, optionally limited to `symbols`
    #[instrument(skip(self))]
    pub async fn account(&self, symbols: Option<&[&str]>) -> RestResult<Value> {
        let symbols = symbols.map(|s| s.join(","));
        let params = self.client.timestamped(Params::new().with_opt("symbols", symbols));
        self.client.call(&ISOLATED_ACCOUNT, params).await
    }

    /// One isolated margin pair
    #[instrument(skip(self))]
    pub async fn pair(&self, symbol: &str) -> RestResult<Value> {
        let params = self.client.timestamped(Params::new().with("symbol", symbol));
        self.client.call(&ISOLATED_PAIR, params).await
    }

    /// All isolated margin pairs
    #[instrument(skip(self))]
    pub async fn all_pairs(&self) -> RestResult<Value> {
        let params = self.client.timestamped(Params::new());
        self.client.call(&ISOLATED_ALL_PAIRS, params).await
    }

    /// Move `amount` of `asset` between spot and the isolated account.
    ///
    /// `trans_from` / `trans_to` are `"SPOT"` or `"ISOLATED_MARGIN"`.
    #[instrument(skip(self))]
    pub async fn transfer(
        &self,
        asset: &str,
        symbol: &str,
        trans_from: &str,
        trans_to: &str,
        amount: &str,
    ) -> RestResult<Value> {
        let params = Params::new()
            .with("asset", asset)
            .with("symbol", symbol)
            .with("transFrom", trans_from)
            .with("transTo", trans_to)
            .with("amount", amount);
        let params = self.client.timestamped(params);
        self.client.call(&ISOLATED_TRANSFER, params).await
    }

    /// Place an order on the isolated pair
    ///
    /// `order` holds the fields after `symbol` (`side`, `type`, `quantity`, ...).
    #[instrument(skip(self, order))]
    pub async fn new_order(&self, symbol: &str, order: Params) -> RestResult<Value> {
        let mut params = Self::isolated(symbol);
        for (k, v) in order.iter() {
            params.push(k, v);
        }
        let params = self.client.timestamped(params);
        self.client.call(&NEW_ORDER, params).await
    }

    /// Cancel an order on the isolated pair
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, symbol: &str, order: &OrderRef) -> RestResult<Value> {
        let params = self.client.timestamped(order.append_to(Self::isolated(symbol)));
        self.client.call(&CANCEL_ORDER, params).await
    }

    /// Status of an order on the isolated pair
    #[instrument(skip(self))]
    pub async fn order_status(&self, symbol: &str, order: &OrderRef) -> RestResult<Value> {
        let params = self.client.timestamped(order.append_to(Self::isolated(symbol)));
        self.client.call(&QUERY_ORDER, params).await
    }

    /// Open orders on the isolated pair
    #[instrument(skip(self))]
    pub async fn open_orders(&self, symbol: &str) -> RestResult<Value> {
        let params = self.client.timestamped(Self::isolated(symbol));
        self.client.call(&OPEN_ORDERS, params).await
    }

    /// Trades on the isolated pair
    #[instrument(skip(self))]
    pub async fn my_trades(&self, symbol: &str) -> RestResult<Value> {
        let params = self.client.timestamped(Self::isolated(symbol));
        self.client.call(&MY_TRADES, params).await
    }

    /// Borrow `amount` of `asset` into the isolated account
    #[instrument(skip(self))]
    pub async fn borrow(&self, asset: &str, symbol: &str, amount: &str) -> RestResult<Value> {
        let params = Params::new()
            .with("asset", asset)
            .with("isIsolated", "TRUE")
            .with("symbol", symbol)
            .with("amount", amount);
        let params = self.client.timestamped(params);
        self.client.call(&BORROW, params).await
    }

    /// Repay `amount` of `asset` in the isolated account
    #[instrument(skip(self))]
    pub async fn repay(&self, asset: &str, symbol: &str, amount: &str) -> RestResult<Value> {
        let params = Params::new()
            .with("asset", asset)
            .with("isIsolated", "TRUE")
            .with("symbol", symbol)
            .with("amount", amount);
        let params = self.client.timestamped(params);
        self.client.call(&REPAY, params).await
    }
}
