//! Callback signature primitives.
//!
//! Razorpay signs its checkout callback as `HMAC-SHA256(order_id + "|" + payment_id)`, keyed with the API secret,
//! hex-encoded. Both operations here are pure functions; the secret never leaves the caller.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the expected callback signature for an (order id, payment id) pair as a lowercase hex string.
pub fn compute_signature(order_id: &str, payment_id: &str, secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Checks a supplied signature against the expected HMAC in constant time.
///
/// A signature that is not valid hex can never match and is rejected outright.
pub fn verify_signature(order_id: &str, payment_id: &str, secret: &[u8], supplied: &str) -> bool {
    let supplied = match hex::decode(supplied.trim()) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    // verify_slice is a constant-time comparison
    mac.verify_slice(&supplied).is_ok()
}
