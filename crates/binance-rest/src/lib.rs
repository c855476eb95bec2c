//! REST API client for the Binance cryptocurrency exchange
//!
//! Requests are described once, authenticated by a per-client
//! [`RequestPreprocessor`] and dispatched through a [`ConnectionPool`] that
//! many clients share.
//!
//! # Authentication
//!
//! Every request carries a [`Classification`]:
//!
//! - `Public`: sent as-is
//! - `ApiKeyOnly`: `X-MBX-APIKEY` header
//! - `Signed`: header plus an HMAC-SHA256 `signature` over the exact query
//!   string, appended last
//!
//! A missing credential fails locally with [`RestError::Authentication`];
//! nothing reaches the network.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use binance_rest::{BinanceRestClient, ConnectionPool, Credentials, PoolConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = Arc::new(ConnectionPool::new(PoolConfig::default())?);
//!
//!     let client = BinanceRestClient::new("https://api.binance.com", Credentials::empty(), pool.clone())?;
//!     let book = client.market().order_book("BTCUSDT", Some(5)).await?;
//!     println!("{}", book);
//!
//!     let auth_client = BinanceRestClient::new("https://api.binance.com", Credentials::from_env()?, pool)?;
//!     let account = auth_client.account().account().await?;
//!     println!("{}", account);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Rate Limiting
//!
//! The pool bounds concurrency, not request weight. Exchange weight limits
//! surface as `Server` errors with status 429 or 418; nothing is retried.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod pool;
pub mod preprocessor;
pub mod request;
pub mod user_stream;

// Re-export main types
pub use client::BinanceRestClient;
pub use error::{RestError, RestResult, LISTEN_KEY_NOT_FOUND_CODE};
pub use pool::{
    ConnectionPool, PoolConfig, PoolPermit, StreamSlot, DEFAULT_MAX_REQUESTS,
    DEFAULT_MAX_REQUESTS_PER_HOST,
};
pub use preprocessor::RequestPreprocessor;
pub use request::{
    Classification, Params, PreparedRequest, RestRequest, API_KEY_HEADER, SIGNATURE_PARAM,
};
pub use user_stream::{
    ListenKey, SessionState, StreamScope, UserStreamSession, DEFAULT_RENEWAL_INTERVAL,
    LISTEN_KEY_TTL,
};

// Re-export endpoint types
pub use endpoints::account::OrderRef;
pub use endpoints::{EndpointSpec, HttpMethod};

// Re-export credentials so callers need only this crate
pub use binance_auth::{AuthError, Credentials};
