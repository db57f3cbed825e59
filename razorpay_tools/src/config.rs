use apg_common::Secret;
use log::*;

const DEFAULT_API_URL: &str = "https://api.razorpay.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// The public key id, e.g. "rzp_live_xxxxxxxx". Safe to hand to clients for checkout initialisation.
    pub key_id: String,
    /// The server-held API secret. Also keys the callback signature HMAC.
    pub key_secret: Secret<String>,
    pub api_url: String,
    /// Bound on every network call to the processor. A timeout surfaces as `GatewayUnavailable`.
    pub timeout_secs: u64,
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self {
            key_id: String::default(),
            key_secret: Secret::default(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RazorpayConfig {
    pub fn new_from_env_or_default() -> Self {
        let key_id = std::env::var("APG_RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            error!("APG_RAZORPAY_KEY_ID is not set. Order creation will fail until it is configured.");
            String::default()
        });
        let key_secret = Secret::new(std::env::var("APG_RAZORPAY_KEY_SECRET").unwrap_or_else(|_| {
            error!("APG_RAZORPAY_KEY_SECRET is not set. Signature verification will reject all callbacks.");
            String::default()
        }));
        let api_url = std::env::var("APG_RAZORPAY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = std::env::var("APG_RAZORPAY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self { key_id, key_secret, api_url, timeout_secs }
    }
}
