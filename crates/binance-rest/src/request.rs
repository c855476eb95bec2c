//! Request descriptors
//!
//! A [`RestRequest`] is what endpoint code builds: method, path, ordered
//! query parameters, optional body and the [`Classification`] tag. The tag is
//! metadata for the pre-processor only. [`PreparedRequest`] is what comes out
//! of the pre-processor and has no place to carry it.

use std::fmt;

use reqwest::Method;

use crate::error::{RestError, RestResult};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Query parameter carrying the signature
pub const SIGNATURE_PARAM: &str = "signature";

/// Required trust level of an endpoint call
///
/// Variants are ordered: `Signed` implies everything `ApiKeyOnly` requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Classification {
    /// No credentials
    #[default]
    Public,
    /// API key header only (`USER_STREAM`, `MARKET_DATA` security types)
    ApiKeyOnly,
    /// API key header plus HMAC signature (`TRADE`, `USER_DATA` security types)
    Signed,
}

impl Classification {
    /// Check if the API key header must be attached
    pub fn requires_api_key(&self) -> bool {
        *self >= Self::ApiKeyOnly
    }

    /// Check if the query must be signed
    pub fn requires_signature(&self) -> bool {
        *self == Self::Signed
    }

    /// Short lowercase name, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::ApiKeyOnly => "api_key",
            Self::Signed => "signed",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered query parameters
///
/// Order is preserved exactly as inserted; it is part of the signed payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Empty parameter list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// Append a parameter if `value` is set
    pub fn with_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Append a parameter in place
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), value.to_string()));
    }

    /// Append `recvWindow` (if given) and the current `timestamp` in milliseconds
    pub fn timestamped(self, recv_window: Option<u64>) -> Self {
        self.timestamped_at(recv_window, chrono::Utc::now().timestamp_millis())
    }

    /// Append `recvWindow` (if given) and an explicit `timestamp`
    pub fn timestamped_at(self, recv_window: Option<u64>, timestamp_ms: i64) -> Self {
        self.with_opt("recvWindow", recv_window)
            .with("timestamp", timestamp_ms)
    }

    /// Check whether a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Value of the first parameter named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over parameters in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no parameters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical query string: caller order, form percent-encoding
    pub fn encode(&self) -> RestResult<String> {
        serde_urlencoded::to_string(&self.0).map_err(|e| RestError::Signing(e.to_string()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

/// An outgoing call before authentication
#[derive(Debug, Clone)]
pub struct RestRequest {
    method: Method,
    path: String,
    params: Params,
    body: Option<String>,
    classification: Option<Classification>,
}

impl RestRequest {
    /// New request with no parameters and no classification
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Params::new(),
            body: None,
            classification: None,
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set the classification tag (replaces any previous tag)
    pub fn classification(mut self, classification: Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    /// Replace the query parameters
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Append one query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push(key, value);
        self
    }

    /// Set a raw request body (sent as-is, not signed)
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// HTTP method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters
    pub fn query(&self) -> &Params {
        &self.params
    }

    /// Classification tag, if one was set
    pub fn tag(&self) -> Option<Classification> {
        self.classification
    }

    pub(crate) fn into_untagged(self) -> (UntaggedRequest, Option<Classification>) {
        (
            UntaggedRequest {
                method: self.method,
                path: self.path,
                params: self.params,
                body: self.body,
            },
            self.classification,
        )
    }
}

/// Request with the classification tag already removed
pub(crate) struct UntaggedRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) params: Params,
    pub(crate) body: Option<String>,
}

/// A request ready to hand to the transport
///
/// The query string is final: it is transmitted byte-for-byte as stored here.
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    method: Method,
    path: String,
    query: String,
    api_key: Option<String>,
    body: Option<String>,
    signed: bool,
}

impl PreparedRequest {
    pub(crate) fn new(
        untagged: UntaggedRequest,
        query: String,
        api_key: Option<String>,
        signed: bool,
    ) -> Self {
        Self {
            method: untagged.method,
            path: untagged.path,
            query,
            api_key,
            body: untagged.body,
            signed,
        }
    }

    /// HTTP method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Final encoded query string (without leading `?`)
    pub fn query_string(&self) -> &str {
        &self.query
    }

    /// Value of the API key header, if attached
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Request body
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Whether the request went through the signing step
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Headers to put on the wire
    pub fn headers(&self) -> Vec<(&'static str, &str)> {
        match &self.api_key {
            Some(key) => vec![(API_KEY_HEADER, key.as_str())],
            None => Vec::new(),
        }
    }

    /// Full URL against `base_url`
    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        if self.query.is_empty() {
            format!("{}{}", base, self.path)
        } else {
            format!("{}{}?{}", base, self.path, self.query)
        }
    }
}

impl fmt::Debug for PreparedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("has_api_key", &self.api_key.is_some())
            .field("signed", &self.signed)
            .finish()
    }
}
