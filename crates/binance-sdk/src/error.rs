//! SDK error type

use binance_rest::RestError;
use binance_ws::TransportError;

/// Errors from the factory and streaming client
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// REST client, pool or configuration error
    #[error(transparent)]
    Rest(#[from] RestError),

    /// WebSocket handshake or stream error
    #[error("Stream error: {0}")]
    Transport(#[from] TransportError),
}

impl SdkError {
    /// Check if this error came from the network layer
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Rest(e) => e.is_transport(),
            Self::Transport(_) => true,
        }
    }
}

/// Result type for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;
