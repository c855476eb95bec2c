//! Request pre-processor
//!
//! The one place where classification tags are read and removed, the API key
//! header is attached, and queries are signed. Everything here is synchronous
//! and does no I/O, so it runs before a request ever waits for a pool permit.

use binance_auth::{AuthError, Credentials};
use tracing::trace;

use crate::error::{RestError, RestResult};
use crate::request::{Classification, PreparedRequest, RestRequest, SIGNATURE_PARAM};

/// Authenticates and signs requests for one credential pair
///
/// Each client owns its own pre-processor; it must never be shared between
/// clients with different credentials.
#[derive(Debug, Clone)]
pub struct RequestPreprocessor {
    credentials: Credentials,
}

impl RequestPreprocessor {
    /// Bind a pre-processor to a credential pair
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// The API key this pre-processor attaches
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Turn a tagged request into a wire-ready one.
    ///
    /// An untagged request is treated as public. Missing credentials for an
    /// authenticated endpoint fail here, never at the exchange.
    pub fn process(&self, request: RestRequest) -> RestResult<PreparedRequest> {
        let (request, tag) = request.into_untagged();
        let classification = tag.unwrap_or(Classification::Public);

        let api_key = if classification.requires_api_key() {
            Some(self.credentials.require_api_key()?.to_string())
        } else {
            None
        };

        let mut query = request.params.encode()?;

        if classification.requires_signature() {
            if !self.credentials.has_secret_key() {
                return Err(AuthError::MissingSecretKey.into());
            }
            if request.params.contains(SIGNATURE_PARAM) {
                return Err(RestError::Signing(format!(
                    "query for {} already carries a `{}` parameter",
                    request.path, SIGNATURE_PARAM
                )));
            }
            // An empty query is sent unsigned; the exchange rejects it on its own
            // terms rather than us inventing a payload.
            if !query.is_empty() {
                let signature = self.credentials.sign(&query)?;
                query.push('&');
                query.push_str(SIGNATURE_PARAM);
                query.push('=');
                query.push_str(&signature);
            }
        }

        trace!(
            path = %request.path,
            classification = %classification,
            "Prepared request"
        );

        Ok(PreparedRequest::new(
            request,
            query,
            api_key,
            classification.requires_signature(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Params, API_KEY_HEADER};
    use binance_auth::sign;

    const SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";

    fn order_params() -> Params {
        Params::new()
            .with("symbol", "ETHBTC")
            .with("side", "BUY")
            .with("type", "LIMIT")
            .with("timestamp", 1499827319559u64)
    }

    fn full() -> RequestPreprocessor {
        RequestPreprocessor::new(Credentials::new("my-api-key", SECRET))
    }

    #[test]
    fn test_signed_request_known_vector() {
        let req = RestRequest::post("/api/v3/order")
            .params(order_params())
            .classification(Classification::Signed);

        let prepared = full().process(req).unwrap();

        assert_eq!(
            prepared.query_string(),
            "symbol=ETHBTC&side=BUY&type=LIMIT&timestamp=1499827319559\
             &signature=cbb2a8d123fe23eeb7b6b9616c9cde13177e06af37cc4809a716b866c6027c9e"
        );
        assert_eq!(prepared.api_key(), Some("my-api-key"));
        assert!(prepared.is_signed());
    }

    #[test]
    fn test_signature_is_single_and_last() {
        let req = RestRequest::get("/api/v3/order")
            .params(order_params())
            .classification(Classification::Signed);
        let prepared = full().process(req).unwrap();
        let query = prepared.query_string();

        assert_eq!(query.matches("signature=").count(), 1);
        let (unsigned, signature) = query.rsplit_once("&signature=").unwrap();
        assert_eq!(unsigned, order_params().encode().unwrap());
        assert_eq!(signature, sign(unsigned.as_bytes(), SECRET.as_bytes()));
    }

    #[test]
    fn test_signed_empty_query_is_not_signed() {
        let req = RestRequest::get("/api/v3/account").classification(Classification::Signed);
        let prepared = full().process(req).unwrap();

        assert_eq!(prepared.query_string(), "");
        assert!(prepared.is_signed());
        assert_eq!(prepared.api_key(), Some("my-api-key"));
    }

    #[test]
    fn test_public_request_never_authenticated() {
        let req = RestRequest::get("/api/v3/depth")
            .param("symbol", "BTCUSDT")
            .classification(Classification::Public);
        let prepared = full().process(req).unwrap();

        assert_eq!(prepared.query_string(), "symbol=BTCUSDT");
        assert!(prepared.headers().is_empty());
        assert!(!prepared.is_signed());
    }

    #[test]
    fn test_untagged_request_is_public() {
        let req = RestRequest::get("/api/v3/time");
        let prepared = RequestPreprocessor::new(Credentials::empty())
            .process(req)
            .unwrap();
        assert_eq!(prepared.api_key(), None);
    }

    #[test]
    fn test_api_key_only_request() {
        let req = RestRequest::get("/api/v3/historicalTrades")
            .param("symbol", "BTCUSDT")
            .classification(Classification::ApiKeyOnly);
        let prepared = full().process(req).unwrap();

        assert_eq!(prepared.headers(), vec![(API_KEY_HEADER, "my-api-key")]);
        assert_eq!(prepared.query_string(), "symbol=BTCUSDT");
        assert!(!prepared.is_signed());
    }

    #[test]
    fn test_public_with_empty_credentials() {
        let pre = RequestPreprocessor::new(Credentials::empty());
        let req = RestRequest::get("/api/v3/ping").classification(Classification::Public);
        assert!(pre.process(req).is_ok());
    }

    #[test]
    fn test_api_key_required() {
        let pre = RequestPreprocessor::new(Credentials::new("", SECRET));
        let req = RestRequest::post("/api/v3/userDataStream")
            .classification(Classification::ApiKeyOnly);
        let err = pre.process(req).unwrap_err();
        assert!(matches!(err, RestError::Authentication(AuthError::MissingApiKey)));
    }

    #[test]
    fn test_signed_requires_secret() {
        let pre = RequestPreprocessor::new(Credentials::new("my-api-key", ""));
        let req = RestRequest::get("/api/v3/account")
            .params(Params::new().timestamped(None))
            .classification(Classification::Signed);
        let err = pre.process(req).unwrap_err();
        assert!(matches!(
            err,
            RestError::Authentication(AuthError::MissingSecretKey)
        ));
    }

    #[test]
    fn test_presigned_query_rejected() {
        let req = RestRequest::get("/api/v3/order")
            .params(order_params().with("signature", "deadbeef"))
            .classification(Classification::Signed);
        let err = full().process(req).unwrap_err();
        assert!(matches!(err, RestError::Signing(_)));
    }

    #[test]
    fn test_no_state_between_calls() {
        let pre = full();
        let make = || {
            RestRequest::get("/api/v3/order")
                .params(order_params())
                .classification(Classification::Signed)
        };
        let first = pre.process(make()).unwrap();
        let second = pre.process(make()).unwrap();
        assert_eq!(first, second);
    }
}
