//! Endpoint registry
//!
//! Every REST endpoint is a row in a table: name, method, path and the trust
//! level it needs. One generic routine ([`BinanceRestClient::call`]) serves
//! them all; the grouped wrappers in the submodules only assemble parameters.
//!
//! [`BinanceRestClient::call`]: crate::client::BinanceRestClient::call

use reqwest::Method;

use crate::request::{Classification, Params, RestRequest};

pub mod account;
pub mod margin;
pub mod market;
pub mod trading;
pub mod user_data;

pub use account::AccountEndpoints;
pub use margin::MarginEndpoints;
pub use market::MarketEndpoints;
pub use trading::TradingEndpoints;

/// HTTP verbs used by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Equivalent `reqwest` method
    pub fn to_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }
}

/// Static description of one REST endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Stable name for lookup and logging
    pub name: &'static str,
    /// HTTP verb
    pub method: HttpMethod,
    /// Path relative to the base URL
    pub path: &'static str,
    /// Required trust level
    pub classification: Classification,
}

impl EndpointSpec {
    /// Describe an endpoint
    pub const fn new(
        name: &'static str,
        method: HttpMethod,
        path: &'static str,
        classification: Classification,
    ) -> Self {
        Self {
            name,
            method,
            path,
            classification,
        }
    }

    /// Build a tagged request for this endpoint
    pub fn request(&self, params: Params) -> RestRequest {
        RestRequest::new(self.method.to_method(), self.path)
            .params(params)
            .classification(self.classification)
    }
}

/// Every endpoint known to the client
pub const REGISTRY: &[EndpointSpec] = &[
    market::PING,
    market::SERVER_TIME,
    market::EXCHANGE_INFO,
    market::ORDER_BOOK,
    market::RECENT_TRADES,
    market::HISTORICAL_TRADES,
    market::AGG_TRADES,
    market::KLINES,
    market::TICKER_24HR,
    market::TICKER_PRICE,
    market::BOOK_TICKER,
    trading::NEW_ORDER,
    trading::NEW_ORDER_TEST,
    trading::NEW_OCO_ORDER,
    trading::CANCEL_ORDER,
    trading::CANCEL_OCO_ORDER,
    account::ACCOUNT,
    account::QUERY_ORDER,
    account::QUERY_OCO_ORDER,
    account::OPEN_ORDERS,
    account::ALL_ORDERS,
    account::MY_TRADES,
    account::DEPOSIT_ADDRESS,
    account::DEPOSIT_HISTORY,
    account::WITHDRAW_HISTORY,
    account::WITHDRAW,
    account::ALL_ASSETS,
    account::SUB_ACCOUNT_TRANSFERS,
    account::DUST_TRANSFER,
    margin::ISOLATED_CREATE_ACCOUNT,
    margin::ISOLATED_ACCOUNT,
    margin::ISOLATED_PAIR,
    margin::ISOLATED_ALL_PAIRS,
    margin::ISOLATED_TRANSFER,
    margin::NEW_ORDER,
    margin::CANCEL_ORDER,
    margin::QUERY_ORDER,
    margin::OPEN_ORDERS,
    margin::MY_TRADES,
    margin::BORROW,
    margin::REPAY,
    user_data::SPOT_START,
    user_data::SPOT_KEEPALIVE,
    user_data::SPOT_CLOSE,
    user_data::MARGIN_START,
    user_data::MARGIN_KEEPALIVE,
    user_data::MARGIN_CLOSE,
    user_data::ISOLATED_START,
    user_data::ISOLATED_KEEPALIVE,
    user_data::ISOLATED_CLOSE,
];

/// Look up an endpoint by name
pub fn find(name: &str) -> Option<&'static EndpointSpec> {
    REGISTRY.iter().find(|e| e.name == name)
}
