//! API credentials for authenticated requests
//!
//! # Security
//!
//! The secret key is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use secrecy::{ExposeSecret, SecretString};

use crate::error::{AuthError, AuthResult};
use crate::signer;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
/// Environment variable holding the secret key
pub const SECRET_KEY_ENV: &str = "BINANCE_SECRET_KEY";

/// API key / secret key pair bound to a single client
///
/// Either half may be empty. A client built from empty credentials can still
/// call public endpoints; the missing half is only reported when an endpoint
/// actually requires it.
pub struct Credentials {
    /// API key (sent in the clear as a header)
    api_key: String,
    /// Secret key (zeroized on drop, never transmitted)
    secret_key: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key and secret key
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: SecretString::from(secret_key.into()),
        }
    }

    /// Credentials with neither key set, for public-only clients
    pub fn empty() -> Self {
        Self::new("", "")
    }

    /// Create credentials from environment variables
    ///
    /// Reads `BINANCE_API_KEY` and `BINANCE_SECRET_KEY` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_KEY_ENV.to_string()))?;
        let secret_key = std::env::var(SECRET_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(SECRET_KEY_ENV.to_string()))?;

        let creds = Self::new(api_key, secret_key);
        creds.validate()?;
        Ok(creds)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Check whether an API key is present
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Check whether a secret key is present
    pub fn has_secret_key(&self) -> bool {
        !self.secret_key.expose_secret().is_empty()
    }

    /// The API key, or `MissingApiKey` if it is empty
    pub fn require_api_key(&self) -> AuthResult<&str> {
        if self.has_api_key() {
            Ok(&self.api_key)
        } else {
            Err(AuthError::MissingApiKey)
        }
    }

    /// Check that both keys can be carried in a header / HMAC key.
    ///
    /// Keys are issued as printable ASCII; whitespace or control characters
    /// mean the value was pasted or loaded incorrectly.
    pub fn validate(&self) -> AuthResult<()> {
        if !is_printable_ascii(&self.api_key) {
            return Err(AuthError::InvalidCredentials(
                "API key contains non-printable or non-ASCII characters".to_string(),
            ));
        }
        if !is_printable_ascii(self.secret_key.expose_secret()) {
            return Err(AuthError::InvalidCredentials(
                "secret key contains non-printable or non-ASCII characters".to_string(),
            ));
        }
        Ok(())
    }

    /// Sign a canonical query string with the secret key
    ///
    /// Fails with `MissingSecretKey` rather than signing with an empty key.
    pub fn sign(&self, payload: &str) -> AuthResult<String> {
        let secret = self.secret_key.expose_secret();
        if secret.is_empty() {
            return Err(AuthError::MissingSecretKey);
        }
        Ok(signer::sign(payload.as_bytes(), secret.as_bytes()))
    }
}

fn is_printable_ascii(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_graphic())
}

impl Clone for Credentials {
    /// Clone credentials (creates new SecretString with same content)
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            secret_key: SecretString::from(self.secret_key.expose_secret().to_owned()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.api_key.chars().take(8).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format!("{}...", prefix))
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("test_api_key_123456", "super_secret_value");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super_secret_value"));
        assert!(!debug.contains("test_api_key_123456"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_empty_credentials() {
        let creds = Credentials::empty();
        assert!(!creds.has_api_key());
        assert!(!creds.has_secret_key());
        assert!(creds.validate().is_ok());
        assert_eq!(creds.require_api_key(), Err(AuthError::MissingApiKey));
    }

    #[test]
    fn test_sign_without_secret_fails() {
        let creds = Credentials::new("key", "");
        assert_eq!(creds.sign("timestamp=1"), Err(AuthError::MissingSecretKey));
    }

    #[test]
    fn test_sign_matches_signer() {
        let creds = Credentials::new("key", "secret");
        assert_eq!(
            creds.sign("a=1&b=2").unwrap(),
            signer::sign(b"a=1&b=2", b"secret")
        );
    }

    #[test]
    fn test_validate_rejects_whitespace() {
        let creds = Credentials::new("key with space", "secret");
        assert!(matches!(
            creds.validate(),
            Err(AuthError::InvalidCredentials(_))
        ));

        let creds = Credentials::new("key", "secret\n");
        assert!(matches!(
            creds.validate(),
            Err(AuthError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_clone_preserves_secret() {
        let creds = Credentials::new("key", "secret");
        let cloned = creds.clone();
        assert_eq!(cloned.api_key(), "key");
        assert_eq!(cloned.sign("x=1"), creds.sign("x=1"));
    }
}
