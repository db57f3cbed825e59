//! `SqliteDatabase` is a concrete implementation of the order record store.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the [`OrderStore`] trait via the query functions in
//! [`super::db::orders`].
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{new_pool, orders};
use crate::{
    db_types::{NewOrder, Order, OrderStatusType},
    traits::{OrderStore, PaymentEngineError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to the database at `APG_DATABASE_URL`, falling back to the default path.
    pub async fn new(max_connections: u32) -> Result<Self, PaymentEngineError> {
        let url = super::db::db_url();
        Self::new_with_url(&url, max_connections).await
    }

    /// Creates a new connection pool with `max_connections` connections to the database at `url`.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, PaymentEngineError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl OrderStore for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, PaymentEngineError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }

    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, PaymentEngineError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_id(id, &mut conn).await?)
    }

    async fn fetch_order_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Order>, PaymentEngineError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_gateway_order_id(gateway_order_id, &mut conn).await?)
    }

    async fn fetch_order_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, PaymentEngineError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_payment_id(payment_id, &mut conn).await?)
    }

    async fn attach_gateway_order_id(&self, id: i64, gateway_order_id: &str) -> Result<Order, PaymentEngineError> {
        let mut conn = self.pool.acquire().await?;
        orders::attach_gateway_order_id(id, gateway_order_id, &mut conn).await
    }

    async fn finalize_order(
        &self,
        id: i64,
        new_status: OrderStatusType,
        payment_id: Option<&str>,
    ) -> Result<Option<Order>, PaymentEngineError> {
        let mut conn = self.pool.acquire().await?;
        orders::finalize_order(id, new_status, payment_id, &mut conn).await
    }

    async fn close(&mut self) -> Result<(), PaymentEngineError> {
        self.pool.close().await;
        Ok(())
    }
}
