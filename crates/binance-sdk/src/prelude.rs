//! Re-exports for convenience
//!
//! Import everything you need with:
//! ```
//! use binance_sdk::prelude::*;
//! ```

// Factory and streaming
pub use crate::environment::Environment;
pub use crate::error::{SdkError, SdkResult};
pub use crate::factory::ClientFactory;
pub use crate::streaming::StreamingClient;

// Credentials
pub use binance_auth::{AuthError, Credentials};

// REST
pub use binance_rest::{
    BinanceRestClient, Classification, ConnectionPool, ListenKey, OrderRef, Params, PoolConfig,
    RestError, RestRequest, RestResult, SessionState, StreamScope, UserStreamSession,
    DEFAULT_RENEWAL_INTERVAL,
};

// Streams
pub use binance_ws::{DisconnectReason, StreamEvent, StreamHandle, StreamOptions};
