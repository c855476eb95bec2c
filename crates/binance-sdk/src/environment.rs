//! Deployment environments

use std::fmt;

use binance_ws::Endpoint;

/// Production REST base URL
pub const PRODUCTION_REST_URL: &str = "https://api.binance.com";

/// Spot testnet REST base URL
pub const TESTNET_REST_URL: &str = "https://testnet.binance.vision";

/// Which exchange deployment to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    /// Live exchange (default)
    #[default]
    Production,
    /// Spot testnet
    Testnet,
}

impl Environment {
    /// REST base URL
    pub fn rest_url(&self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_REST_URL,
            Self::Testnet => TESTNET_REST_URL,
        }
    }

    /// Stream endpoint
    pub fn stream_endpoint(&self) -> Endpoint {
        match self {
            Self::Production => Endpoint::Production,
            Self::Testnet => Endpoint::Testnet,
        }
    }

    /// Stream base URL
    pub fn stream_url(&self) -> &'static str {
        self.stream_endpoint().url()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}
