use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderItem, Product},
    traits::LedgerError,
};

pub async fn insert_product(
    name: &str,
    producer_code: &str,
    conn: &mut SqliteConnection,
) -> Result<Product, LedgerError> {
    let product = sqlx::query_as("INSERT INTO products (name, producer_code) VALUES ($1, $2) RETURNING *")
        .bind(name)
        .bind(producer_code)
        .fetch_one(conn)
        .await?;
    Ok(product)
}

/// Inserts an order together with its lines. This is not atomic. Embed this call inside a transaction if you need
/// the order and its lines to appear together.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, LedgerError> {
    let total = order.total_amount();
    let inserted: Order =
        sqlx::query_as("INSERT INTO orders (buyer_id, status, total_amount) VALUES ($1, $2, $3) RETURNING *")
            .bind(order.buyer_id)
            .bind(order.status)
            .bind(total)
            .fetch_one(&mut *conn)
            .await?;
    for item in order.items {
        sqlx::query("INSERT INTO order_items (order_id, product_id, quantity, unit_price) VALUES ($1, $2, $3, $4)")
            .bind(inserted.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *conn)
            .await?;
    }
    debug!("📦️ Order #{} of {total} inserted", inserted.id);
    Ok(inserted)
}

pub async fn fetch_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, LedgerError> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, LedgerError> {
    let items =
        sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id").bind(order_id).fetch_all(conn).await?;
    Ok(items)
}

/// Bumps the settlement counter on every line of the order whose product carries `producer_code`. Lines belonging to
/// other producers are left alone. Returns the number of lines marked.
pub async fn mark_items_settled(
    order_id: i64,
    producer_code: &str,
    conn: &mut SqliteConnection,
) -> Result<u64, LedgerError> {
    let result = sqlx::query(
        r#"
        UPDATE order_items SET settlement_count = settlement_count + 1
        WHERE order_id = $1
          AND product_id IN (SELECT id FROM products WHERE producer_code = $2)"#,
    )
    .bind(order_id)
    .bind(producer_code)
    .execute(conn)
    .await?;
    trace!("📦️ {} lines of order #{order_id} marked as settled for {producer_code}", result.rows_affected());
    Ok(result.rows_affected())
}
