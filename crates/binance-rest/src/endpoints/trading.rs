//! Trading endpoints for order management
//!
//! All `SIGNED`. Order fields are passed as ordered [`Params`]; the wrappers
//! only append `recvWindow`/`timestamp`.

use serde_json::Value;
use tracing::instrument;

use super::account::OrderRef;
use super::{EndpointSpec, HttpMethod};
use crate::client::BinanceRestClient;
use crate::error::RestResult;
use crate::request::{Classification, Params};

pub const NEW_ORDER: EndpointSpec =
    EndpointSpec::new("new_order", HttpMethod::Post, "/api/v3/order", Classification::Signed);
pub const NEW_ORDER_TEST: EndpointSpec = EndpointSpec::new(
    "new_order_test",
    HttpMethod::Post,
    "/api/v3/order/test",
    Classification::Signed,
);
pub const NEW_OCO_ORDER: EndpointSpec = EndpointSpec::new(
    "new_oco_order",
    HttpMethod::Post,
    "/api/v3/order/oco",
    Classification::Signed,
);
pub const CANCEL_ORDER: EndpointSpec = EndpointSpec::new(
    "cancel_order",
    HttpMethod::Delete,
    "/api/v3/order",
    Classification::Signed,
);
pub const CANCEL_OCO_ORDER: EndpointSpec = EndpointSpec::new(
    "cancel_oco_order",
    HttpMethod::Delete,
    "/api/v3/orderList",
    Classification::Signed,
);

/// Trading endpoints for order management
pub struct TradingEndpoints<'a> {
    client: &'a BinanceRestClient,
}

impl<'a> TradingEndpoints<'a> {
    pub fn new(client: &'a BinanceRestClient) -> Self {
        Self { client }
    }

    /// Place an order
    ///
    /// # Arguments
    /// * `order` - Order fields in the order they should be sent
    ///   (`symbol`, `side`, `type`, `quantity`, ...)
    #[instrument(skip(self, order))]
    pub async fn new_order(&self, order: Params) -> RestResult<Value> {
        let params = self.client.timestamped(order);
        self.client.call(&NEW_ORDER, params).await
    }

    /// Validate an order without sending it to the matching engine
    #[instrument(skip(self, order))]
    pub async fn new_order_test(&self, order: Params) -> RestResult<Value> {
        let params = self.client.timestamped(order);
        self.client.call(&NEW_ORDER_TEST, params).await
    }

    /// Place a market order for `quantity` of the base asset
    #[instrument(skip(self))]
    pub async fn market_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
    ) -> RestResult<Value> {
        let order = Params::new()
            .with("symbol", symbol)
            .with("side", side)
            .with("type", "MARKET")
            .with("quantity", quantity);
        self.new_order(order).await
    }

    /// Place a good-till-cancelled limit order
    #[instrument(skip(self))]
    pub async fn limit_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
        price: &str,
    ) -> RestResult<Value> {
        let order = Params::new()
            .with("symbol", symbol)
            .with("side", side)
            .with("type", "LIMIT")
            .with("timeInForce", "GTC")
            .with("quantity", quantity)
            .with("price", price);
        self.new_order(order).await
    }

    /// Place a one-cancels-the-other order pair
    #[instrument(skip(self, order))]
    pub async fn new_oco_order(&self, order: Params) -> RestResult<Value> {
        let params = self.client.timestamped(order);
        self.client.call(&NEW_OCO_ORDER, params).await
    }

    /// Cancel an active order
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, symbol: &str, order: &OrderRef) -> RestResult<Value> {
        let params = order.append_to(Params::new().with("symbol", symbol));
        let params = self.client.timestamped(params);
        self.client.call(&CANCEL_ORDER, params).await
    }

    /// Cancel an entire OCO order list
    #[instrument(skip(self))]
    pub async fn cancel_oco_order(&self, symbol: &str, order_list_id: u64) -> RestResult<Value> {
        let params = Params::new()
            .with("symbol", symbol)
            .with("orderListId", order_list_id);
        let params = self.client.timestamped(params);
        self.client.call(&CANCEL_OCO_ORDER, params).await
    }
}
