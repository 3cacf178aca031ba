//! Sales history rows backing the restock report

use rust_decimal::Decimal;
use sqlx::PgPool;

/// One sold line item joined with its product. The restock computation in
/// `report` works entirely off these rows.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SalesRow {
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub quantity_in_stock: i32,
    pub quantity: i32,
    pub price_at_purchase: Decimal,
}

pub async fn sales_rows_for_seller(
    pool: &PgPool,
    seller_id: &str,
) -> Result<Vec<SalesRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT p.id AS product_id, p.name AS product_name, p.category,
                p.quantity_in_stock, oi.quantity, oi.price_at_purchase
         FROM order_items oi
         JOIN orders o ON o.id = oi.order_id
         JOIN products p ON p.id = oi.product_id
         WHERE o.seller_id = $1",
    )
    .bind(seller_id)
    .fetch_all(pool)
    .await
}
