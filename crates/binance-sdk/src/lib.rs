//! Binance client SDK
//!
//! Entry point tying the workspace together: a [`ClientFactory`] owns the
//! shared connection pool and hands out REST clients, each with its own
//! credentials, and [`StreamingClient`]s for market and user data streams.
//!
//! # Quick Start
//!
//! ```no_run
//! use binance_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let factory = ClientFactory::new(PoolConfig::default())?;
//!     let client = factory.create_test_client(Credentials::from_env()?)?;
//!
//!     // Listen key for the user data stream
//!     let mut session = UserStreamSession::spot(client);
//!     let key = session.create().await?;
//!
//!     let streams = factory.create_test_streaming_client()?;
//!     let mut stream = streams.open_user_stream(&key).await?;
//!
//!     while let Some(event) = stream.recv().await {
//!         match event {
//!             StreamEvent::Message(text) => println!("{}", text),
//!             StreamEvent::Disconnected(reason) => {
//!                 println!("stream ended: {}", reason);
//!                 break;
//!             }
//!         }
//!         if session.renewal_due(DEFAULT_RENEWAL_INTERVAL) {
//!             session.keep_alive().await?;
//!         }
//!     }
//!
//!     stream.cancel().await;
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - **Shared transport**: one pool, bounded in total and per host
//! - **Per-client identity**: credentials never leak between clients
//! - **Local auth checks**: missing keys fail before anything is sent
//! - **Listen key lifecycle**: create, keep alive, close

pub mod environment;
pub mod error;
pub mod factory;
pub mod prelude;
pub mod streaming;

// Re-export main types
pub use environment::Environment;
pub use error::{SdkError, SdkResult};
pub use factory::ClientFactory;
pub use streaming::StreamingClient;

// Re-export commonly used types from dependencies
pub use binance_auth::Credentials;
pub use binance_rest::{BinanceRestClient, ConnectionPool, PoolConfig, RestError};
pub use binance_ws::{StreamEvent, StreamHandle, StreamOptions};
