//! HMAC-SHA256 signer

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Sign `payload` with `secret`.
///
/// Returns the lowercase hex encoding of HMAC-SHA256(secret, payload). The
/// payload must be the exact bytes that will be transmitted: parameters in
/// caller order, already percent-encoded, without the `signature` field.
pub fn sign(payload: &[u8], secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
