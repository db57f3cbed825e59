use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderStatusType},
    traits::PaymentEngineError,
};

/// Inserts a new order into the database using the given connection. The status column takes its `Pending` default.
/// This is not atomic on its own; embed it inside a transaction and pass `&mut *tx` if you need atomicity with
/// other statements.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, PaymentEngineError> {
    let notes = order.notes_as_json();
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                customer_name,
                customer_email,
                customer_phone,
                customer_website,
                amount,
                currency,
                receipt,
                notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *;
        "#,
    )
    .bind(order.customer.name)
    .bind(order.customer.email)
    .bind(order.customer.phone)
    .bind(order.customer.website)
    .bind(order.amount.value())
    .bind(order.currency)
    .bind(order.receipt)
    .bind(notes)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order inserted with id {}", order.id);
    Ok(order)
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_by_gateway_order_id(
    gateway_order_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE gateway_order_id = $1")
        .bind(gateway_order_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

pub async fn fetch_order_by_payment_id(
    payment_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE gateway_payment_id = $1")
        .bind(payment_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Writes the processor-assigned order id onto the local row, exactly once. The `gateway_order_id IS NULL` guard
/// makes reassignment impossible even under concurrent callers.
pub async fn attach_gateway_order_id(
    id: i64,
    gateway_order_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Order, PaymentEngineError> {
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET gateway_order_id = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 AND gateway_order_id \
         IS NULL RETURNING *",
    )
    .bind(gateway_order_id)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    match result {
        Some(order) => Ok(order),
        None => match fetch_order_by_id(id, conn).await? {
            Some(_) => Err(PaymentEngineError::GatewayOrderIdAlreadySet(id)),
            None => Err(PaymentEngineError::OrderIdNotFound(id)),
        },
    }
}

/// The atomic compare-and-set at the heart of reconciliation: `UPDATE ... WHERE id = ? AND status = 'Pending'`.
/// Exactly one of any number of concurrent callers sees a row come back; the rest observe `None` and must treat the
/// transition as already decided.
pub async fn finalize_order(
    id: i64,
    new_status: OrderStatusType,
    payment_id: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, PaymentEngineError> {
    trace!("📝️ Attempting {new_status} transition for order {id}");
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET status = $1, gateway_payment_id = COALESCE($2, gateway_payment_id), updated_at = \
         CURRENT_TIMESTAMP WHERE id = $3 AND status = 'Pending' RETURNING *",
    )
    .bind(new_status.to_string())
    .bind(payment_id)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    trace!("📝️ Result of finalize_order for {id}: applied={}", result.is_some());
    Ok(result)
}
