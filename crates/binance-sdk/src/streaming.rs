//! Streaming client
//!
//! Opens raw WebSocket streams through the factory's pool. The handshake
//! counts against the pool's request limits like any other request; once
//! the socket is up the permit is released and the stream is tracked in
//! [`ConnectionPool::open_streams`] until its reader exits.

use std::sync::Arc;

use binance_rest::{ConnectionPool, ListenKey, RestError};
use binance_ws::{stream_url, StreamHandle, StreamOptions, Transport, WsTransport};
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::SdkResult;

/// Opens market and user data streams
#[derive(Clone)]
pub struct StreamingClient {
    base_url: String,
    host: String,
    pool: Arc<ConnectionPool>,
    options: StreamOptions,
}

impl StreamingClient {
    /// Create a streaming client for a `ws://` or `wss://` base URL
    pub fn new(
        base_url: &str,
        pool: Arc<ConnectionPool>,
        options: StreamOptions,
    ) -> SdkResult<Self> {
        let url = Url::parse(base_url).map_err(|e| {
            RestError::Configuration(format!("invalid stream URL {:?}: {}", base_url, e))
        })?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(RestError::Configuration(format!(
                "unsupported scheme {:?} in stream URL",
                url.scheme()
            ))
            .into());
        }
        let host = url
            .host_str()
            .ok_or_else(|| RestError::Configuration("stream URL has no host".to_string()))?;
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            host,
            pool,
            options,
        })
    }

    /// Stream base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Options applied to every stream
    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    /// The shared pool
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    /// Replace the stream options
    pub fn with_options(mut self, options: StreamOptions) -> Self {
        self.options = options;
        self
    }

    /// Open the user data stream for a listen key
    pub async fn open_user_stream(&self, listen_key: &ListenKey) -> SdkResult<StreamHandle> {
        self.open(listen_key.as_str()).await
    }

    /// Open a market stream such as `btcusdt@trade` or `ethbtc@depth5`
    pub async fn open_market(&self, stream: &str) -> SdkResult<StreamHandle> {
        self.open(stream).await
    }

    async fn open(&self, stream: &str) -> SdkResult<StreamHandle> {
        let transport = WsTransport::new(stream_url(&self.base_url, stream))
            .with_timeout(self.options.connect_timeout);
        self.open_transport(transport).await
    }

    /// Connect `transport` under a pool permit and start its reader
    #[instrument(skip(self, transport), fields(endpoint = transport.endpoint()))]
    pub async fn open_transport<T>(&self, mut transport: T) -> SdkResult<StreamHandle>
    where
        T: Transport + 'static,
    {
        {
            let _permit = self.pool.acquire(&self.host).await?;
            debug!("Stream handshake");
            transport.connect().await?;
        }

        let slot = self.pool.register_stream();
        info!(open_streams = self.pool.open_streams(), "Stream opened");
        Ok(StreamHandle::spawn(transport, slot, &self.options))
    }
}

impl std::fmt::Debug for StreamingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingClient")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}
