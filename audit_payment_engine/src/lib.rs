//! Audit Payment Engine
//!
//! The core logic for taking an SEO-audit purchase from intent to a reconciled, fulfilled order. It is
//! provider-agnostic: the payment processor sits behind the [`traits::PaymentGateway`] seam and persistence behind
//! [`traits::OrderStore`].
//!
//! The library is divided into three main sections:
//! 1. Data types and storage ([`db_types`], [`mod@sqlite`]). One row per purchase attempt, with a conditional
//!    compare-and-set on the status column as the sole concurrency-control mechanism.
//! 2. The order flow API ([`OrderFlowApi`]). Creates pending orders against the processor and reconciles payment
//!    callbacks exactly once.
//! 3. Events ([`mod@events`]). When a verification call wins the `Pending → Completed` transition, an
//!    `OrderCompletedEvent` is published so that fulfillment (invoice generation, email) can run as a best-effort
//!    side effect without delaying or failing the verification response.

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod order_objects;
pub mod traits;

mod order_flow_api;

pub mod test_utils;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use order_flow_api::OrderFlowApi;
pub use traits::{GatewayError, OrderStore, PaymentEngineError, PaymentGateway};
