//! Test doubles for the engine's two seams, plus SQLite test-environment setup.
//!
//! [`MemoryOrderStore`] is a full in-memory implementation of [`crate::traits::OrderStore`], including the
//! compare-and-set semantics of `finalize_order`. [`StubGateway`] substitutes the payment processor with
//! configurable canned responses and a trivial (but still enforced) signature scheme.

mod memory_store;
mod stub_gateway;

#[cfg(feature = "sqlite")]
pub mod prepare_env;

pub use memory_store::MemoryOrderStore;
pub use stub_gateway::StubGateway;
