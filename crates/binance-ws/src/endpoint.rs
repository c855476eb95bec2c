//! WebSocket endpoint definitions

use std::fmt;

/// Binance raw stream endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endpoint {
    /// Production streams (default)
    #[default]
    Production,
    /// Spot testnet streams
    Testnet,
}

impl Endpoint {
    /// Get the WebSocket base URL for this endpoint
    pub fn url(&self) -> &'static str {
        match self {
            Self::Production => "wss://stream.binance.com:9443/ws",
            Self::Testnet => "wss://testnet.binance.vision/ws",
        }
    }

    /// URL of one stream: a listen key or a stream name like `btcusdt@trade`
    pub fn stream_url(&self, stream: &str) -> String {
        stream_url(self.url(), stream)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// Join a stream base URL and a stream name
pub fn stream_url(base: &str, stream: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), stream.trim_start_matches('/'))
}
