mod api;
mod config;
mod error;
mod signature;

mod data_objects;

pub use api::RazorpayApi;
pub use config::RazorpayConfig;
pub use data_objects::{NewRemoteOrder, RemoteOrder, RemotePayment, RemotePaymentStatus};
pub use error::RazorpayApiError;
pub use signature::{compute_signature, verify_signature};
