use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// Published exactly once per order, by the verification call that wins the `Pending → Completed` transition.
/// Carries the finalized order snapshot for the fulfillment collaborator (invoice generation, email).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCompletedEvent {
    pub order: Order,
}

impl OrderCompletedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}
