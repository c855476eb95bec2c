//! Error types for authentication operations

/// Errors that can occur while preparing authenticated requests
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Endpoint needs an API key but the client was built without one
    #[error("API key required for this endpoint")]
    MissingApiKey,

    /// Endpoint needs a signature but the client was built without a secret
    #[error("secret key required for this endpoint")]
    MissingSecretKey,

    /// Credential contains characters that cannot be sent
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
