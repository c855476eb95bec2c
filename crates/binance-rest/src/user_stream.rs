//! User data stream sessions
//!
//! A listen key authorizes one push stream of account events. The exchange
//! expires it after [`LISTEN_KEY_TTL`] unless it is renewed, and sends no
//! notice when that happens: a silent stream is the only symptom, which is
//! why push streams carry an idle timeout.
//!
//! Renewal is caller-driven. [`UserStreamSession::renewal_due`] reports when
//! a keep-alive should be sent; nothing here runs a timer.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::client::BinanceRestClient;
use crate::endpoints::{user_data, EndpointSpec};
use crate::error::{RestError, RestResult};
use crate::request::Params;

/// How long the exchange keeps an unrenewed listen key alive
pub const LISTEN_KEY_TTL: Duration = Duration::from_secs(60 * 60);

/// Recommended keep-alive interval
pub const DEFAULT_RENEWAL_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Opaque token naming one user data stream
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ListenKey(String);

impl ListenKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ListenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "ListenKey({}...)", prefix)
    }
}

#[derive(Deserialize)]
struct ListenKeyResponse {
    #[serde(rename = "listenKey")]
    listen_key: String,
}

/// Which account a user data stream reports on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StreamScope {
    /// Spot account
    Spot,
    /// Cross margin account
    Margin,
    /// One isolated margin pair
    IsolatedMargin { symbol: String },
}

impl StreamScope {
    /// Isolated margin scope for `symbol`
    pub fn isolated(symbol: impl Into<String>) -> Self {
        Self::IsolatedMargin {
            symbol: symbol.into(),
        }
    }

    /// Start, keep-alive and close endpoints for this scope
    fn endpoints(&self) -> (&'static EndpointSpec, &'static EndpointSpec, &'static EndpointSpec) {
        match self {
            Self::Spot => (
                &user_data::SPOT_START,
                &user_data::SPOT_KEEPALIVE,
                &user_data::SPOT_CLOSE,
            ),
            Self::Margin => (
                &user_data::MARGIN_START,
                &user_data::MARGIN_KEEPALIVE,
                &user_data::MARGIN_CLOSE,
            ),
            Self::IsolatedMargin { .. } => (
                &user_data::ISOLATED_START,
                &user_data::ISOLATED_KEEPALIVE,
                &user_data::ISOLATED_CLOSE,
            ),
        }
    }

    fn params(&self) -> Params {
        match self {
            Self::IsolatedMargin { symbol } => Params::new().with("symbol", symbol),
            _ => Params::new(),
        }
    }

    fn keyed_params(&self, key: &ListenKey) -> Params {
        let mut params = Params::new().with("listenKey", key.as_str());
        if let Self::IsolatedMargin { symbol } = self {
            params.push("symbol", symbol);
        }
        params
    }
}

impl fmt::Display for StreamScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot => f.write_str("spot"),
            Self::Margin => f.write_str("margin"),
            Self::IsolatedMargin { symbol } => write!(f, "isolated:{}", symbol),
        }
    }
}

/// Lifecycle state of a [`UserStreamSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// No listen key obtained yet
    #[default]
    Uninitialized,
    /// Holding a live listen key
    Active,
    /// Terminal
    Closed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Raw listen key operations
// ============================================================================

impl BinanceRestClient {
    /// Obtain a new listen key (`POST`)
    #[instrument(skip(self))]
    pub async fn start_user_data_stream(&self, scope: &StreamScope) -> RestResult<ListenKey> {
        let (start, _, _) = scope.endpoints();
        let response: ListenKeyResponse = self.call(start, scope.params()).await?;
        Ok(ListenKey(response.listen_key))
    }

    /// Extend a listen key's validity (`PUT`)
    #[instrument(skip(self))]
    pub async fn keep_alive_user_data_stream(
        &self,
        scope: &StreamScope,
        key: &ListenKey,
    ) -> RestResult<()> {
        let (_, keep_alive, _) = scope.endpoints();
        self.execute(keep_alive.request(scope.keyed_params(key)))
            .await?;
        Ok(())
    }

    /// Invalidate a listen key (`DELETE`)
    #[instrument(skip(self))]
    pub async fn close_user_data_stream(
        &self,
        scope: &StreamScope,
        key: &ListenKey,
    ) -> RestResult<()> {
        let (_, _, close) = scope.endpoints();
        self.execute(close.request(scope.keyed_params(key))).await?;
        Ok(())
    }
}

// ============================================================================
// Session
// ============================================================================

/// One listen key and its lifecycle
///
/// `Uninitialized -> Active -> Closed`. `Closed` is terminal; open a new
/// session to stream again.
///
/// # Example
///
/// ```no_run
/// # use binance_rest::{BinanceRestClient, UserStreamSession, StreamScope, DEFAULT_RENEWAL_INTERVAL};
/// # async fn run(client: BinanceRestClient) -> binance_rest::RestResult<()> {
/// let mut session = UserStreamSession::new(client, StreamScope::Spot);
/// let key = session.create().await?;
///
/// // later, from the caller's own scheduler
/// if session.renewal_due(DEFAULT_RENEWAL_INTERVAL) {
///     session.keep_alive().await?;
/// }
///
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct UserStreamSession {
    client: BinanceRestClient,
    scope: StreamScope,
    state: SessionState,
    listen_key: Option<ListenKey>,
    last_renewed: Option<Instant>,
}

impl UserStreamSession {
    pub fn new(client: BinanceRestClient, scope: StreamScope) -> Self {
        Self {
            client,
            scope,
            state: SessionState::Uninitialized,
            listen_key: None,
            last_renewed: None,
        }
    }

    /// Spot account session
    pub fn spot(client: BinanceRestClient) -> Self {
        Self::new(client, StreamScope::Spot)
    }

    /// Cross margin session
    pub fn margin(client: BinanceRestClient) -> Self {
        Self::new(client, StreamScope::Margin)
    }

    /// Isolated margin session for one pair
    pub fn isolated_margin(client: BinanceRestClient, symbol: impl Into<String>) -> Self {
        Self::new(client, StreamScope::isolated(symbol))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn scope(&self) -> &StreamScope {
        &self.scope
    }

    /// Current listen key, while active
    pub fn listen_key(&self) -> Option<&ListenKey> {
        match self.state {
            SessionState::Active => self.listen_key.as_ref(),
            _ => None,
        }
    }

    /// When the key was obtained or last renewed
    pub fn last_renewed(&self) -> Option<Instant> {
        self.last_renewed
    }

    /// Whether an active key has gone `interval` without renewal
    pub fn renewal_due(&self, interval: Duration) -> bool {
        match (self.state, self.last_renewed) {
            (SessionState::Active, Some(at)) => at.elapsed() >= interval,
            _ => false,
        }
    }

    /// Obtain a listen key
    ///
    /// On an active session this returns the current key without a request.
    pub async fn create(&mut self) -> RestResult<ListenKey> {
        match self.state {
            SessionState::Active => {
                if let Some(key) = &self.listen_key {
                    return Ok(key.clone());
                }
            }
            SessionState::Closed => return Err(self.invalid_state("uninitialized")),
            SessionState::Uninitialized => {}
        }

        let key = self.client.start_user_data_stream(&self.scope).await?;
        info!(scope = %self.scope, "User data stream opened");

        self.listen_key = Some(key.clone());
        self.last_renewed = Some(Instant::now());
        self.state = SessionState::Active;
        Ok(key)
    }

    /// Extend the key's validity by another [`LISTEN_KEY_TTL`]
    pub async fn keep_alive(&mut self) -> RestResult<()> {
        let key = match (self.state, &self.listen_key) {
            (SessionState::Active, Some(key)) => key.clone(),
            _ => return Err(self.invalid_state("active")),
        };

        self.client
            .keep_alive_user_data_stream(&self.scope, &key)
            .await?;
        debug!(scope = %self.scope, "Listen key renewed");

        self.last_renewed = Some(Instant::now());
        Ok(())
    }

    /// Invalidate the key and end the session
    ///
    /// Safe to call repeatedly. A key the server no longer knows counts as
    /// closed.
    pub async fn close(&mut self) -> RestResult<SessionState> {
        if self.state == SessionState::Closed {
            return Ok(SessionState::Closed);
        }

        if let Some(key) = self.listen_key.take() {
            match self.client.close_user_data_stream(&self.scope, &key).await {
                Ok(()) => info!(scope = %self.scope, "User data stream closed"),
                Err(e) if e.is_listen_key_not_found() => {
                    warn!(scope = %self.scope, "Listen key already gone on close");
                }
                Err(e) => {
                    self.listen_key = Some(key);
                    return Err(e);
                }
            }
        }

        self.state = SessionState::Closed;
        self.last_renewed = None;
        Ok(SessionState::Closed)
    }

    fn invalid_state(&self, expected: &str) -> RestError {
        RestError::InvalidState {
            expected: expected.to_string(),
            actual: self.state.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{ConnectionPool, PoolConfig};
    use binance_auth::Credentials;
    use std::sync::Arc;

    fn session(scope: StreamScope) -> UserStreamSession {
        let pool = Arc::new(ConnectionPool::new(PoolConfig::default()).unwrap());
        let client =
            BinanceRestClient::new("http://127.0.0.1:1", Credentials::new("key", ""), pool)
                .unwrap();
        UserStreamSession::new(client, scope)
    }

    #[test]
    fn test_scope_endpoints() {
        let (start, keep_alive, close) = StreamScope::Spot.endpoints();
        assert_eq!(start.path, "/api/v3/userDataStream");
        assert_eq!(keep_alive.path, start.path);
        assert_eq!(close.path, start.path);

        let (start, _, _) = StreamScope::Margin.endpoints();
        assert_eq!(start.path, "/sapi/v1/userDataStream");

        let (start, _, _) = StreamScope::isolated("BNBUSDT").endpoints();
        assert_eq!(start.path, "/sapi/v1/userDataStream/isolated");
    }

    #[test]
    fn test_isolated_params_carry_symbol() {
        let scope = StreamScope::isolated("BNBUSDT");
        assert_eq!(scope.params().encode().unwrap(), "symbol=BNBUSDT");

        let key = ListenKey::new("abc");
        assert_eq!(
            scope.keyed_params(&key).encode().unwrap(),
            "listenKey=abc&symbol=BNBUSDT"
        );
        assert_eq!(
            StreamScope::Spot.keyed_params(&key).encode().unwrap(),
            "listenKey=abc"
        );
    }

    #[test]
    fn test_listen_key_response() {
        let body = r#"{"listenKey":"pqia91ma19a5s61cv6a81va65sdf19v8a65a1a5s61cv6a81va65sdf19v8a65a1"}"#;
        let response: ListenKeyResponse = serde_json::from_str(body).unwrap();
        assert!(response.listen_key.starts_with("pqia91ma"));
    }

    #[test]
    fn test_listen_key_debug_is_truncated() {
        let key = ListenKey::new("pqia91ma19a5s61cv6a81va65sdf");
        assert_eq!(format!("{:?}", key), "ListenKey(pqia91ma...)");
        assert_eq!(key.to_string(), "pqia91ma19a5s61cv6a81va65sdf");
    }

    #[test]
    fn test_new_session_is_uninitialized() {
        let session = session(StreamScope::Spot);
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(session.listen_key().is_none());
        assert!(!session.renewal_due(Duration::ZERO));
    }

    #[tokio::test]
    async fn test_keep_alive_requires_active() {
        let mut session = session(StreamScope::Spot);
        let err = session.keep_alive().await.unwrap_err();
        match err {
            RestError::InvalidState { expected, actual } => {
                assert_eq!(expected, "active");
                assert_eq!(actual, "uninitialized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_close_uninitialized_marks_closed() {
        let mut session = session(StreamScope::Margin);
        assert_eq!(session.close().await.unwrap(), SessionState::Closed);
        assert_eq!(session.close().await.unwrap(), SessionState::Closed);

        assert!(matches!(
            session.create().await,
            Err(RestError::InvalidState { .. })
        ));
        assert!(matches!(
            session.keep_alive().await,
            Err(RestError::InvalidState { .. })
        ));
    }
}
