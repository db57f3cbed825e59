use std::env;

use apg_common::helpers::parse_boolean_flag;
use log::*;
use razorpay_tools::RazorpayConfig;

const DEFAULT_APG_HOST: &str = "127.0.0.1";
const DEFAULT_APG_PORT: u16 = 8480;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Payment processor credentials and endpoint. The secret also keys the callback signature HMAC.
    pub razorpay: RazorpayConfig,
    /// When true, payment corroboration against the processor is stubbed out: every fetched payment reports captured
    /// with the order's own amount. Signature verification and the idempotent state transition stay fully active.
    pub test_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_APG_HOST.to_string(),
            port: DEFAULT_APG_PORT,
            database_url: String::default(),
            razorpay: RazorpayConfig::default(),
            test_mode: false,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("APG_HOST").ok().unwrap_or_else(|| DEFAULT_APG_HOST.into());
        let port = env::var("APG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for APG_PORT. {e} Using the default, {DEFAULT_APG_PORT}, instead."
                    );
                    DEFAULT_APG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_APG_PORT);
        let database_url = env::var("APG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ APG_DATABASE_URL is not set. Please set it to the URL for the order database.");
            String::default()
        });
        let razorpay = RazorpayConfig::new_from_env_or_default();
        let test_mode = parse_boolean_flag(env::var("APG_TEST_MODE").ok(), false);
        if test_mode {
            warn!(
                "🪛️ APG_TEST_MODE is enabled. Payment corroboration against the processor is STUBBED. Do not run \
                 production traffic against this instance."
            );
        }
        Self { host, port, database_url, razorpay, test_mode }
    }
}
