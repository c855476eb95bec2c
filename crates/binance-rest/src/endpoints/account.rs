//! Account and order query endpoints
//!
//! These endpoints require a signature.

use serde_json::Value;
use tracing::instrument;

use super::{EndpointSpec, HttpMethod};
use crate::client::BinanceRestClient;
use crate::error::RestResult;
use crate::request::{Classification, Params};

pub const ACCOUNT: EndpointSpec =
    EndpointSpec::new("account", HttpMethod::Get, "/api/v3/account", Classification::Signed);
pub const QUERY_ORDER: EndpointSpec =
    EndpointSpec::new("query_order", HttpMethod::Get, "/api/v3/order", Classification::Signed);
pub const QUERY_OCO_ORDER: EndpointSpec = EndpointSpec::new(
    "query_oco_order",
    HttpMethod::Get,
    "/api/v3/orderList",
    Classification::Signed,
);
pub const OPEN_ORDERS: EndpointSpec = EndpointSpec::new(
    "open_orders",
    HttpMethod::Get,
    "/api/v3/openOrders",
    Classification::Signed,
);
pub const ALL_ORDERS: EndpointSpec = EndpointSpec::new(
    "all_orders",
    HttpMethod::Get,
    "/api/v3/allOrders",
    Classification::Signed,
);
pub const MY_TRADES: EndpointSpec =
    EndpointSpec::new("my_trades", HttpMethod::Get, "/api/v3/myTrades", Classification::Signed);
pub const DEPOSIT_ADDRESS: EndpointSpec = EndpointSpec::new(
    "deposit_address",
    HttpMethod::Get,
    "/sapi/v1/capital/deposit/address",
    Classification::Signed,
);
pub const DEPOSIT_HISTORY: EndpointSpec = EndpointSpec::new(
    "deposit_history",
    HttpMethod::Get,
    "/sapi/v1/capital/deposit/hisrec",
    Classification::Signed,
);
pub const WITHDRAW_HISTORY: EndpointSpec = EndpointSpec::new(
    "withdraw_history",
    HttpMethod::Get,
    "/sapi/v1/capital/withdraw/history",
    Classification::Signed,
);
pub const WITHDRAW: EndpointSpec = EndpointSpec::new(
    "withdraw",
    HttpMethod::Post,
    "/sapi/v1/capital/withdraw/apply",
    Classification::Signed,
);
pub const ALL_ASSETS: EndpointSpec = EndpointSpec::new(
    "all_assets",
    HttpMethod::Get,
    "/sapi/v1/capital/config/getall",
    Classification::Signed,
);
pub const SUB_ACCOUNT_TRANSFERS: EndpointSpec = EndpointSpec::new(
    "sub_account_transfers",
    HttpMethod::Get,
    "/sapi/v1/sub-account/transfer/subUserHistory",
    Classification::Signed,
);
pub const DUST_TRANSFER: EndpointSpec = EndpointSpec::new(
    "dust_transfer",
    HttpMethod::Post,
    "/sapi/v1/asset/dust",
    Classification::Signed,
);

/// Identifies an order either by exchange id or by client order id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRef {
    /// Exchange-assigned `orderId`
    Id(u64),
    /// Caller-assigned `origClientOrderId`
    ClientId(String),
}

impl OrderRef {
    /// Append the matching parameter
    pub fn append_to(&self, params: Params) -> Params {
        match self {
            Self::Id(id) => params.with("orderId", id),
            Self::ClientId(id) => params.with("origClientOrderId", id),
        }
    }
}

impl From<u64> for OrderRef {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for OrderRef {
    fn from(id: &str) -> Self {
        Self::ClientId(id.to_string())
    }
}

/// Account and order query endpoints
pub struct AccountEndpoints<'a> {
    client: &'a BinanceRestClient,
}

impl<'a> AccountEndpoints<'a> {
    pub fn new(client: &'a BinanceRestClient) -> Self {
        Self { client }
    }

    /// Current account information and balances
    #[instrument(skip(self))]
    pub async fn account(&self) -> RestResult<Value> {
        let params = self.client.timestamped(Params::new());
        self.client.call(&ACCOUNT, params).await
    }

    /// Status of one order
    #[instrument(skip(self))]
    pub async fn order_status(&self, symbol: &str, order: &OrderRef) -> RestResult<Value> {
        let params = order.append_to(Params::new().with("symbol", symbol));
        let params = self.client.timestamped(params);
        self.client.call(&QUERY_ORDER, params).await
    }

    /// Status of one OCO order list
    #[instrument(skip(self))]
    pub async fn oco_order_status(&self, order_list_id: u64) -> RestResult<Value> {
        let params = self
            .client
            .timestamped(Params::new().with("orderListId", order_list_id));
        self.client.call(&QUERY_OCO_ORDER, params).await
    }

    /// Open orders, for one symbol or all
    #[instrument(skip(self))]
    pub async fn open_orders(&self, symbol: Option<&str>) -> RestResult<Value> {
        let params = self.client.timestamped(Params::new().with_opt("symbol", symbol));
        self.client.call(&OPEN_ORDERS, params).await
    }

    /// All orders for a symbol: active, cancelled or filled
    #[instrument(skip(self))]
    pub async fn all_orders(
        &self,
        symbol: &str,
        order_id: Option<u64>,
        limit: Option<u16>,
    ) -> RestResult<Value> {
        let params = Params::new()
            .with("symbol", symbol)
            .with_opt("orderId", order_id)
            .with_opt("limit", limit);
        let params = self.client.timestamped(params);
        self.client.call(&ALL_ORDERS, params).await
    }

    /// Trades for a symbol
    #[instrument(skip(self))]
    pub async fn my_trades(
        &self,
        symbol: &str,
        limit: Option<u16>,
        from_id: Option<u64>,
    ) -> RestResult<Value> {
        let params = Params::new()
            .with("symbol", symbol)
            .with_opt("limit", limit)
            .with_opt("fromId", from_id);
        let params = self.client.timestamped(params);
        self.client.call(&MY_TRADES, params).await
    }

    /// Deposit address for a coin
    #[instrument(skip(self))]
    pub async fn deposit_address(&self, coin: &str) -> RestResult<Value> {
        let params = self.client.timestamped(Params::new().with("coin", coin));
        self.client.call(&DEPOSIT_ADDRESS, params).await
    }

    /// Deposit history, optionally for one coin
    #[instrument(skip(self))]
    pub async fn deposit_history(&self, coin: Option<&str>) -> RestResult<Value> {
        let params = self.client.timestamped(Params::new().with_opt("coin", coin));
        self.client.call(&DEPOSIT_HISTORY, params).await
    }

    /// Withdrawal history, optionally for one coin
    #[instrument(skip(self))]
    pub async fn withdraw_history(&self, coin: Option<&str>) -> RestResult<Value> {
        let params = self.client.timestamped(Params::new().with_opt("coin", coin));
        self.client.call(&WITHDRAW_HISTORY, params).await
    }

    /// Submit a withdrawal
    ///
    /// Withdrawals must be enabled for the API key.
    #[instrument(skip(self, address, address_tag))]
    pub async fn withdraw(
        &self,
        coin: &str,
        address: &str,
        amount: &str,
        name: Option<&str>,
        address_tag: Option<&str>,
    ) -> RestResult<Value> {
        let params = Params::new()
            .with("coin", coin)
            .with("address", address)
            .with("amount", amount)
            .with_opt("name", name)
            .with_opt("addressTag", address_tag);
        let params = self.client.timestamped(params);
        self.client.call(&WITHDRAW, params).await
    }

    /// Every supported coin with its deposit and withdrawal settings
    #[instrument(skip(self))]
    pub async fn all_assets(&self) -> RestResult<Value> {
        let params = self.client.timestamped(Params::new());
        self.client.call(&ALL_ASSETS, params).await
    }

    /// Transfers between this sub-account and the master account
    #[instrument(skip(self))]
    pub async fn sub_account_transfers(&self) -> RestResult<Value> {
        let params = self.client.timestamped(Params::new());
        self.client.call(&SUB_ACCOUNT_TRANSFERS, params).await
    }

    /// Convert small balances to BNB
    ///
    /// Each asset is sent as its own `asset` parameter.
    #[instrument(skip(self))]
    pub async fn convert_dust_to_bnb(&self, assets: &[&str]) -> RestResult<Value> {
        let params = assets
            .iter()
            .fold(Params::new(), |params, asset| params.with("asset", asset));
        let params = self.client.timestamped(params);
        self.client.call(&DUST_TRANSFER, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_ref_params() {
        let by_id = OrderRef::from(42u64).append_to(Params::new().with("symbol", "BTCUSDT"));
        assert_eq!(by_id.encode().unwrap(), "symbol=BTCUSDT&orderId=42");

        let by_client = OrderRef::from("my-order-1").append_to(Params::new());
        assert_eq!(by_client.get("origClientOrderId"), Some("my-order-1"));
    }

    #[test]
    fn test_wallet_routes_are_signed() {
        for endpoint in [&WITHDRAW, &ALL_ASSETS, &SUB_ACCOUNT_TRANSFERS, &DUST_TRANSFER] {
            assert_eq!(endpoint.classification, Classification::Signed);
            assert!(endpoint.path.starts_with("/sapi/"));
        }
        assert_eq!(WITHDRAW.method, HttpMethod::Post);
        assert_eq!(DUST_TRANSFER.method, HttpMethod::Post);
    }
}
