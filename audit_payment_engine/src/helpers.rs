use chrono::Utc;
use rand::Rng;

/// Generates a receipt/reference token that is practically unique without a central counter: unix milliseconds plus
/// a random suffix.
pub fn new_receipt() -> String {
    let millis = Utc::now().timestamp_millis();
    let nonce = rand::thread_rng().gen::<u32>();
    format!("receipt_{millis}_{nonce:08x}")
}
