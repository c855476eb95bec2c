//! WebSocket stream reader for Binance raw streams
//!
//! Binance pushes market data and user data (account, order and balance
//! updates) over plain WebSocket streams addressed by URL: a stream name
//! like `btcusdt@trade`, or a listen key for user data. This crate connects
//! to such a URL and forwards raw messages through a [`StreamHandle`].
//!
//! # Example
//!
//! ```no_run
//! use binance_ws::{Endpoint, StreamEvent, StreamHandle, StreamOptions, Transport, WsTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = StreamOptions::default();
//!     let mut transport = WsTransport::new(Endpoint::Production.stream_url("btcusdt@trade"))
//!         .with_timeout(options.connect_timeout);
//!     transport.connect().await?;
//!
//!     let mut stream = StreamHandle::spawn(transport, (), &options);
//!     while let Some(event) = stream.recv().await {
//!         match event {
//!             StreamEvent::Message(text) => println!("{}", text),
//!             StreamEvent::Disconnected(reason) => println!("ended: {}", reason),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod endpoint;
pub mod events;
pub mod stream;
pub mod transport;

// Re-export main types
pub use endpoint::{stream_url, Endpoint};
pub use events::{DisconnectReason, StreamEvent};
pub use stream::{StreamHandle, StreamOptions};
pub use transport::{Transport, TransportError, WsTransport, DEFAULT_CONNECT_TIMEOUT};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockTransport;
