//! The two seams of the engine.
//!
//! [`OrderStore`] is the persistence boundary: one row per purchase attempt, with a conditional update as the only
//! concurrency-control mechanism. [`PaymentGateway`] is the network boundary to the payment processor. Both are
//! injected into [`crate::OrderFlowApi`] so tests can substitute doubles without touching process environment state.

mod data_objects;
mod order_store;
mod payment_gateway;

pub use data_objects::{RemoteOrderSummary, RemotePaymentSummary};
pub use order_store::{OrderStore, PaymentEngineError};
pub use payment_gateway::{GatewayError, PaymentGateway};
