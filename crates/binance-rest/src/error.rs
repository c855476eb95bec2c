//! Error types for REST API operations

use binance_auth::AuthError;
use reqwest::StatusCode;

/// Binance error code for an unknown or already-expired listen key
pub const LISTEN_KEY_NOT_FOUND_CODE: i64 = -1125;

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Invalid base URL or malformed credentials at construction time
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Endpoint requires a credential the client does not have.
    ///
    /// Always raised locally, before anything is sent.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    /// Canonical query string could not be signed as-is
    #[error("Signing error: {0}")]
    Signing(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The shared connection pool no longer accepts requests
    #[error("Connection pool closed")]
    PoolClosed,

    /// Exchange answered with a non-2xx status
    #[error("Server error {status}: {body}")]
    Server {
        /// HTTP status code
        status: StatusCode,
        /// Raw response body
        body: String,
    },

    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Operation not allowed in the current session state
    #[error("Invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// State the operation needs
        expected: String,
        /// State the session was in
        actual: String,
    },
}

impl RestError {
    /// Check if this error was raised because a credential was missing
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Check if this error came from the network layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::PoolClosed)
    }

    /// HTTP status of a server error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Binance error code from a server error body (`{"code":-1121,"msg":".."}`)
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Server { body, .. } => serde_json::from_str::<serde_json::Value>(body)
                .ok()?
                .get("code")?
                .as_i64(),
            _ => None,
        }
    }

    /// Check whether the server reported the listen key as unknown
    pub fn is_listen_key_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
            || self.api_code() == Some(LISTEN_KEY_NOT_FOUND_CODE)
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_conversion() {
        let err: RestError = AuthError::MissingApiKey.into();
        assert!(err.is_authentication());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_server_error_code() {
        let err = RestError::Server {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.api_code(), Some(-1121));
        assert!(!err.is_listen_key_not_found());
    }

    #[test]
    fn test_listen_key_not_found() {
        let by_code = RestError::Server {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"code":-1125,"msg":"This listenKey does not exist."}"#.to_string(),
        };
        assert!(by_code.is_listen_key_not_found());

        let by_status = RestError::Server {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        };
        assert!(by_status.is_listen_key_not_found());
    }

    #[test]
    fn test_non_json_body_has_no_code() {
        let err = RestError::Server {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>bad gateway</html>".to_string(),
        };
        assert_eq!(err.api_code(), None);
        assert!(err.to_string().contains("502"));
    }
}
