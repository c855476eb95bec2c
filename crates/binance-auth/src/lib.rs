//! Credentials and request signing for the Binance API
//!
//! Binance authenticates private endpoints in two tiers: an API key sent in
//! the `X-MBX-APIKEY` header, and for `SIGNED` endpoints an HMAC-SHA256
//! signature computed over the exact query string that goes on the wire.
//!
//! This crate performs no I/O. It holds the credential pair and the pure
//! signing function; the REST crate decides when each of them is needed.
//!
//! # Example
//!
//! ```
//! use binance_auth::{sign, Credentials};
//!
//! let creds = Credentials::new("my-api-key", "my-secret");
//! let signature = creds.sign("symbol=ETHBTC&timestamp=1499827319559").unwrap();
//! assert_eq!(signature, sign(b"symbol=ETHBTC&timestamp=1499827319559", b"my-secret"));
//! ```

mod credentials;
mod error;
mod signer;

pub use credentials::{Credentials, API_KEY_ENV, SECRET_KEY_ENV};
pub use error::{AuthError, AuthResult};
pub use signer::sign;
