//! # Audit payment server
//! This module hosts the HTTP boundary for the audit payment gateway. It is responsible for:
//! Accepting order creation requests from the storefront and registering them with the payment processor.
//! Receiving checkout callbacks and handing them to the engine for exactly-once verification.
//! Dispatching fulfillment when a verification call completes an order.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config] for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/create-order`: Creates a pending order and returns the processor order id for client-side checkout.
//! * `/api/verify-payment`: Verifies a checkout callback and reconciles the order, exactly once.

pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
