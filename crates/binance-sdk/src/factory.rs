//! Client factory
//!
//! One factory owns one [`ConnectionPool`]. Every client it creates gets its
//! own credentials and pre-processor but dispatches through that pool, so
//! sockets and concurrency limits are shared process-wide.
//!
//! # Example
//!
//! ```no_run
//! use binance_sdk::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let factory = ClientFactory::new(PoolConfig::default())?;
//!
//! let alice = factory.create_client("https://api.binance.com", Credentials::from_env()?)?;
//! let public = factory.create_client_for(Environment::Production, Credentials::empty())?;
//!
//! let price = public.market().ticker_price(Some("BTCUSDT")).await?;
//! let account = alice.account().account().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use binance_auth::Credentials;
use binance_rest::{BinanceRestClient, ConnectionPool, PoolConfig, RestResult};
use binance_ws::StreamOptions;
use tracing::debug;

use crate::environment::Environment;
use crate::error::SdkResult;
use crate::streaming::StreamingClient;

/// Builds clients that share one connection pool
#[derive(Debug, Clone)]
pub struct ClientFactory {
    pool: Arc<ConnectionPool>,
    stream_options: StreamOptions,
}

impl ClientFactory {
    /// Create a factory and its pool
    pub fn new(config: PoolConfig) -> RestResult<Self> {
        Ok(Self {
            pool: Arc::new(ConnectionPool::new(config)?),
            stream_options: StreamOptions::default(),
        })
    }

    /// Create a factory with default pool limits
    pub fn with_defaults() -> RestResult<Self> {
        Self::new(PoolConfig::default())
    }

    /// Options for streams opened by streaming clients from this factory
    pub fn with_stream_options(mut self, options: StreamOptions) -> Self {
        self.stream_options = options;
        self
    }

    /// The shared pool
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    /// Client bound to `base_url` with its own credentials
    pub fn create_client(
        &self,
        base_url: &str,
        credentials: Credentials,
    ) -> RestResult<BinanceRestClient> {
        let client = BinanceRestClient::new(base_url, credentials, self.pool.clone())?;
        debug!(base_url = client.base_url(), "Factory created client");
        Ok(client)
    }

    /// Client bound to the spot testnet
    pub fn create_test_client(&self, credentials: Credentials) -> RestResult<BinanceRestClient> {
        self.create_client_for(Environment::Testnet, credentials)
    }

    /// Client bound to `environment`
    pub fn create_client_for(
        &self,
        environment: Environment,
        credentials: Credentials,
    ) -> RestResult<BinanceRestClient> {
        self.create_client(environment.rest_url(), credentials)
    }

    /// Streaming client for production streams
    pub fn create_streaming_client(&self) -> SdkResult<StreamingClient> {
        self.create_streaming_client_for(Environment::Production)
    }

    /// Streaming client for testnet streams
    pub fn create_test_streaming_client(&self) -> SdkResult<StreamingClient> {
        self.create_streaming_client_for(Environment::Testnet)
    }

    /// Streaming client for `environment`
    pub fn create_streaming_client_for(
        &self,
        environment: Environment,
    ) -> SdkResult<StreamingClient> {
        self.create_streaming_client_at(environment.stream_url())
    }

    /// Streaming client for a custom stream base URL
    pub fn create_streaming_client_at(&self, base_url: &str) -> SdkResult<StreamingClient> {
        StreamingClient::new(base_url, self.pool.clone(), self.stream_options.clone())
    }
}
