use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::Utc;

use crate::{
    db_types::{NewOrder, Order, OrderStatusType},
    traits::{OrderStore, PaymentEngineError},
};

/// An in-memory [`OrderStore`] with the same conditional-update semantics as the SQLite backend. The whole store
/// sits behind one mutex, so `finalize_order`'s check-and-set is atomic with respect to concurrent callers.
#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    orders: HashMap<i64, Order>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_count(&self) -> usize {
        self.inner.lock().unwrap().orders.len()
    }
}

impl OrderStore for MemoryOrderStore {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, PaymentEngineError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let now = Utc::now();
        let notes = order.notes_as_json();
        let record = Order {
            id: inner.next_id,
            gateway_order_id: None,
            gateway_payment_id: None,
            customer_name: order.customer.name,
            customer_email: order.customer.email,
            customer_phone: order.customer.phone,
            customer_website: order.customer.website,
            amount: order.amount,
            currency: order.currency,
            receipt: order.receipt,
            notes,
            created_at: now,
            updated_at: now,
            status: OrderStatusType::Pending,
        };
        inner.orders.insert(record.id, record.clone());
        Ok(record)
    }

    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, PaymentEngineError> {
        Ok(self.inner.lock().unwrap().orders.get(&id).cloned())
    }

    async fn fetch_order_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Order>, PaymentEngineError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.orders.values().find(|o| o.gateway_order_id.as_deref() == Some(gateway_order_id)).cloned())
    }

    async fn fetch_order_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, PaymentEngineError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.orders.values().find(|o| o.gateway_payment_id.as_deref() == Some(payment_id)).cloned())
    }

    async fn attach_gateway_order_id(&self, id: i64, gateway_order_id: &str) -> Result<Order, PaymentEngineError> {
        let mut inner = self.inner.lock().unwrap();
        let order = inner.orders.get_mut(&id).ok_or(PaymentEngineError::OrderIdNotFound(id))?;
        if order.gateway_order_id.is_some() {
            return Err(PaymentEngineError::GatewayOrderIdAlreadySet(id));
        }
        order.gateway_order_id = Some(gateway_order_id.to_string());
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn finalize_order(
        &self,
        id: i64,
        new_status: OrderStatusType,
        payment_id: Option<&str>,
    ) -> Result<Option<Order>, PaymentEngineError> {
        let mut inner = self.inner.lock().unwrap();
        let order = inner.orders.get_mut(&id).ok_or(PaymentEngineError::OrderIdNotFound(id))?;
        if order.status != OrderStatusType::Pending {
            return Ok(None);
        }
        order.status = new_status;
        if let Some(pid) = payment_id {
            order.gateway_payment_id = Some(pid.to_string());
        }
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }
}
