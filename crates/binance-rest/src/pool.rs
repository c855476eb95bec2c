//! Shared connection pool
//!
//! One [`ConnectionPool`] is owned by a client factory and shared by every
//! client it produces. It wraps a single `reqwest::Client` (sockets, TLS
//! sessions, keep-alive probing) and bounds concurrency twice: once across
//! all destinations and once per destination host. Requests over either bound
//! wait for a permit in FIFO order; nothing is dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use reqwest::{Client, StatusCode};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info};

use crate::error::{RestError, RestResult};

/// Default bound on concurrent in-flight requests
pub const DEFAULT_MAX_REQUESTS: usize = 500;
/// Default bound on concurrent in-flight requests per host
pub const DEFAULT_MAX_REQUESTS_PER_HOST: usize = 500;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(20);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_USER_AGENT: &str = "binance-rest/0.1.0";

/// Pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum concurrent in-flight requests across all hosts
    pub max_requests: usize,
    /// Maximum concurrent in-flight requests per host
    pub max_requests_per_host: usize,
    /// Liveness probe interval for idle connections
    pub ping_interval: Duration,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            max_requests_per_host: DEFAULT_MAX_REQUESTS_PER_HOST,
            ping_interval: DEFAULT_PING_INTERVAL,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: None,
        }
    }
}

impl PoolConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total concurrency bound
    pub fn with_max_requests(mut self, max: usize) -> Self {
        self.max_requests = max;
        self
    }

    /// Set the per-host concurrency bound
    pub fn with_max_requests_per_host(mut self, max: usize) -> Self {
        self.max_requests_per_host = max;
        self
    }

    /// Set the liveness probe interval
    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval;
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    fn validate(&self) -> RestResult<()> {
        if self.max_requests == 0 {
            return Err(RestError::Configuration(
                "max_requests must be at least 1".to_string(),
            ));
        }
        if self.max_requests_per_host == 0 {
            return Err(RestError::Configuration(
                "max_requests_per_host must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Permission to run one request
///
/// Holds one total and one per-host slot until dropped.
#[derive(Debug)]
pub struct PoolPermit {
    _host: OwnedSemaphorePermit,
    _total: OwnedSemaphorePermit,
}

/// Marks one established long-lived stream
///
/// Streams do not count against the request bounds; this only keeps the
/// pool's `open_streams` figure accurate. Decrements on drop.
#[derive(Debug)]
pub struct StreamSlot {
    counter: Arc<AtomicUsize>,
}

impl Drop for StreamSlot {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Process-wide HTTP dispatcher shared by generated clients
pub struct ConnectionPool {
    http: Client,
    config: PoolConfig,
    total: Arc<Semaphore>,
    per_host: DashMap<String, Arc<Semaphore>>,
    open_streams: Arc<AtomicUsize>,
}

impl ConnectionPool {
    /// Build the pool and its underlying HTTP client
    pub fn new(config: PoolConfig) -> RestResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(config.connect_timeout)
            .tcp_keepalive(config.ping_interval)
            .http2_keep_alive_interval(config.ping_interval)
            .http2_keep_alive_while_idle(true)
            .user_agent(config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .build()
            .map_err(|e| RestError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        info!(
            max_requests = config.max_requests,
            max_requests_per_host = config.max_requests_per_host,
            "Created connection pool"
        );

        Ok(Self {
            http,
            total: Arc::new(Semaphore::new(config.max_requests)),
            per_host: DashMap::new(),
            open_streams: Arc::new(AtomicUsize::new(0)),
            config,
        })
    }

    /// Underlying HTTP client, for building requests
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    fn host_semaphore(&self, host: &str) -> Arc<Semaphore> {
        self.per_host
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.config.max_requests_per_host)))
            .clone()
    }

    /// Wait for a request slot towards `host`.
    ///
    /// The per-host slot is taken first so a request stuck behind a busy host
    /// does not also hold one of the global slots.
    pub async fn acquire(&self, host: &str) -> RestResult<PoolPermit> {
        let host_permit = self
            .host_semaphore(host)
            .acquire_owned()
            .await
            .map_err(|_| RestError::PoolClosed)?;
        let total_permit = self
            .total
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| RestError::PoolClosed)?;

        Ok(PoolPermit {
            _host: host_permit,
            _total: total_permit,
        })
    }

    /// Run a request under a permit and read the full body.
    ///
    /// The permit is held until the body has been read.
    pub async fn send(
        &self,
        host: &str,
        request: reqwest::Request,
    ) -> RestResult<(StatusCode, String)> {
        let _permit = self.acquire(host).await?;
        debug!(%host, in_flight = self.in_flight(), "Dispatching request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Register an established stream
    pub fn register_stream(&self) -> StreamSlot {
        self.open_streams.fetch_add(1, Ordering::AcqRel);
        StreamSlot {
            counter: Arc::clone(&self.open_streams),
        }
    }

    /// Requests currently holding a slot
    pub fn in_flight(&self) -> usize {
        self.config.max_requests - self.total.available_permits()
    }

    /// Requests currently holding a slot towards `host`
    pub fn in_flight_for(&self, host: &str) -> usize {
        self.per_host
            .get(host)
            .map(|s| self.config.max_requests_per_host - s.available_permits())
            .unwrap_or(0)
    }

    /// Established streams not yet closed
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::Acquire)
    }

    /// Stop handing out permits; waiting and future requests fail with `PoolClosed`
    pub fn close(&self) {
        self.total.close();
        for entry in self.per_host.iter() {
            entry.value().close();
        }
        info!("Connection pool closed");
    }
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("max_requests", &self.config.max_requests)
            .field("max_requests_per_host", &self.config.max_requests_per_host)
            .field("in_flight", &self.in_flight())
            .field("open_streams", &self.open_streams())
            .finish()
    }
}
