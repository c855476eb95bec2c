//! Main REST client implementation

use std::sync::Arc;

use binance_auth::Credentials;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::endpoints::{
    AccountEndpoints, EndpointSpec, MarginEndpoints, MarketEndpoints, TradingEndpoints,
};
use crate::error::{RestError, RestResult};
use crate::pool::ConnectionPool;
use crate::preprocessor::RequestPreprocessor;
use crate::request::{Params, RestRequest};

/// Binance REST API client
///
/// A client is cheap: its identity (credentials and pre-processor) is its
/// own, while sockets and concurrency limits live in the shared
/// [`ConnectionPool`]. Clones share both.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use binance_auth::Credentials;
/// use binance_rest::{BinanceRestClient, ConnectionPool, PoolConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = Arc::new(ConnectionPool::new(PoolConfig::default())?);
///
///     // Public endpoints only
///     let client = BinanceRestClient::new("https://api.binance.com", Credentials::empty(), pool.clone())?;
///     let price = client.market().ticker_price(Some("BTCUSDT")).await?;
///
///     // Signed endpoints
///     let auth_client = BinanceRestClient::new("https://api.binance.com", Credentials::from_env()?, pool)?;
///     let account = auth_client.account().account().await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BinanceRestClient {
    base_url: String,
    host: String,
    preprocessor: Arc<RequestPreprocessor>,
    pool: Arc<ConnectionPool>,
    recv_window: Option<u64>,
}

impl BinanceRestClient {
    /// Create a client bound to `base_url` with its own credentials
    ///
    /// Fails with `Configuration` if the URL is not an absolute http(s) URL
    /// or a credential cannot be sent.
    pub fn new(
        base_url: &str,
        credentials: Credentials,
        pool: Arc<ConnectionPool>,
    ) -> RestResult<Self> {
        let (base_url, host) = parse_base_url(base_url)?;
        credentials
            .validate()
            .map_err(|e| RestError::Configuration(e.to_string()))?;

        debug!(%base_url, has_api_key = credentials.has_api_key(), "Created Binance REST client");

        Ok(Self {
            base_url,
            host,
            preprocessor: Arc::new(RequestPreprocessor::new(credentials)),
            pool,
            recv_window: None,
        })
    }

    /// Set the `recvWindow` appended to signed requests
    pub fn with_recv_window(mut self, millis: u64) -> Self {
        self.recv_window = Some(millis);
        self
    }

    /// Base URL this client targets
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Destination key used for per-host limits
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The shared pool this client dispatches through
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    /// This client's pre-processor
    pub fn preprocessor(&self) -> &RequestPreprocessor {
        &self.preprocessor
    }

    /// Check if the client has an API key
    pub fn has_api_key(&self) -> bool {
        !self.preprocessor.api_key().is_empty()
    }

    /// Append `recvWindow` and the current `timestamp` for a signed call
    pub fn timestamped(&self, params: Params) -> Params {
        params.timestamped(self.recv_window)
    }

    /// Authenticate, dispatch and return the raw response body
    pub async fn execute(&self, request: RestRequest) -> RestResult<String> {
        let prepared = self.preprocessor.process(request)?;
        let url = prepared.url(&self.base_url);

        let mut builder = self.pool.http().request(prepared.method().clone(), &url);
        for (name, value) in prepared.headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = prepared.body() {
            builder = builder.body(body.to_string());
        }
        let request = builder.build()?;

        debug!(
            method = %prepared.method(),
            path = %prepared.path(),
            signed = prepared.is_signed(),
            "Sending request"
        );

        let (status, body) = self.pool.send(&self.host, request).await?;
        if !status.is_success() {
            warn!(path = %prepared.path(), %status, "Request rejected by server");
            return Err(RestError::Server { status, body });
        }
        Ok(body)
    }

    /// Like [`execute`](Self::execute), decoding the body as JSON
    pub async fn execute_json<T: DeserializeOwned>(&self, request: RestRequest) -> RestResult<T> {
        let body = self.execute(request).await?;
        serde_json::from_str(&body).map_err(|e| RestError::Parse(e.to_string()))
    }

    /// Call a registered endpoint
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &EndpointSpec,
        params: Params,
    ) -> RestResult<T> {
        self.execute_json(endpoint.request(params)).await
    }

    // ========================================================================
    // Endpoint groups
    // ========================================================================

    /// General and market data endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(self)
    }

    /// Order placement and cancellation
    pub fn trading(&self) -> TradingEndpoints<'_> {
        TradingEndpoints::new(self)
    }

    /// Account and order queries
    pub fn account(&self) -> AccountEndpoints<'_> {
        AccountEndpoints::new(self)
    }

    /// Isolated margin endpoints
    pub fn isolated_margin(&self) -> MarginEndpoints<'_> {
        MarginEndpoints::new(self)
    }
}

impl std::fmt::Debug for BinanceRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceRestClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.has_api_key())
            .finish()
    }
}

/// Validate a base URL, returning it without trailing slash plus its host key
fn parse_base_url(base_url: &str) -> RestResult<(String, String)> {
    let url = Url::parse(base_url)
        .map_err(|e| RestError::Configuration(format!("invalid base URL {:?}: {}", base_url, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(RestError::Configuration(format!(
            "unsupported scheme {:?} in base URL",
            url.scheme()
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(RestError::Configuration(
            "base URL must not carry a query or fragment".to_string(),
        ));
    }
    let host = url
        .host_str()
        .ok_or_else(|| RestError::Configuration("base URL has no host".to_string()))?;
    let host = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    Ok((url.as_str().trim_end_matches('/').to_string(), host))
}
