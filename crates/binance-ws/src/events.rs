//! Stream events
//!
//! Payloads are forwarded as received; decoding them is left to the caller.

use std::fmt;

/// Reason for disconnection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Server closed the connection
    ServerClosed,
    /// Network error occurred
    NetworkError(String),
    /// No message received within the idle timeout.
    ///
    /// For a user data stream this usually means the listen key expired.
    IdleTimeout,
    /// Client requested shutdown
    Shutdown,
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServerClosed => write!(f, "server closed the connection"),
            Self::NetworkError(e) => write!(f, "network error: {}", e),
            Self::IdleTimeout => write!(f, "no message within idle timeout"),
            Self::Shutdown => write!(f, "shutdown requested"),
        }
    }
}

/// Event delivered by a [`StreamHandle`](crate::StreamHandle)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Raw message text
    Message(String),
    /// The stream ended; always the last event
    Disconnected(DisconnectReason),
}

impl StreamEvent {
    /// Message text, if this is a message
    pub fn as_message(&self) -> Option<&str> {
        match self {
            Self::Message(text) => Some(text),
            Self::Disconnected(_) => None,
        }
    }
}
