//! Order recording and history
//!
//! Recording a sale is the one place stock is decremented. The whole
//! operation runs in a single transaction with the touched product rows
//! locked, so concurrent orders against the same product serialize and
//! stock can never go negative.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, ErrorCode, ServiceResult};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub seller_id: String,
    pub total_amount: Decimal,
    pub status: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: i32,
    pub price_at_purchase: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: i64,
    pub quantity: i32,
    pub price_at_purchase: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Validate requested line quantities against the locked stock levels.
///
/// A product id missing from `stock` reports not-found. The same product
/// may appear on several lines; the running total is checked, not each
/// line in isolation, so duplicate lines cannot overdraw together.
fn check_stock(
    items: &[OrderItemCreate],
    stock: &HashMap<i64, (String, i32)>,
) -> Result<(), AppError> {
    let mut requested: HashMap<i64, i64> = HashMap::new();
    for item in items {
        let Some((name, in_stock)) = stock.get(&item.product_id) else {
            return Err(AppError::with_message(
                ErrorCode::ProductNotFound,
                format!("Product {} not found", item.product_id),
            )
            .with_detail("product_id", item.product_id));
        };

        let asked = requested.entry(item.product_id).or_insert(0);
        *asked += i64::from(item.quantity);
        if *asked > i64::from(*in_stock) {
            return Err(AppError::with_message(
                ErrorCode::InsufficientStock,
                format!("Not enough stock for {name}. Available: {in_stock}"),
            )
            .with_detail("product_id", item.product_id)
            .with_detail("available", *in_stock));
        }
    }
    Ok(())
}

/// Order total as recorded: sum of quantity times unit price at purchase.
pub fn order_total(items: &[OrderItemCreate]) -> Decimal {
    items
        .iter()
        .map(|item| Decimal::from(item.quantity) * item.price_at_purchase)
        .sum()
}

/// Record a completed sale: validate every line item, decrement stock,
/// insert the order and its items. All of it commits or none of it does.
///
/// Each referenced product row is locked with FOR UPDATE before any check,
/// so the stock read that passes validation is the same stock the decrement
/// sees. Validation runs over all items before the first decrement, so a
/// failing later item leaves earlier items' stock untouched.
pub async fn record_sale(
    pool: &PgPool,
    seller_id: &str,
    items: &[OrderItemCreate],
    now: i64,
) -> ServiceResult<OrderWithItems> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyOrder).into());
    }
    for item in items {
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "Quantity must be positive for product {}",
                item.product_id
            ))
            .into());
        }
        if item.price_at_purchase.is_sign_negative() {
            return Err(AppError::validation(format!(
                "Price must not be negative for product {}",
                item.product_id
            ))
            .into());
        }
    }

    let mut tx = pool.begin().await?;

    // Lock every referenced product row before any check. A product id
    // owned by another seller is indistinguishable from a missing one.
    let mut stock: HashMap<i64, (String, i32)> = HashMap::new();
    for item in items {
        if stock.contains_key(&item.product_id) {
            continue;
        }
        let row: Option<(String, i32)> = sqlx::query_as(
            "SELECT name, quantity_in_stock FROM products
             WHERE id = $1 AND seller_id = $2
             FOR UPDATE",
        )
        .bind(item.product_id)
        .bind(seller_id)
        .fetch_optional(&mut *tx)
        .await?;
        if let Some(row) = row {
            stock.insert(item.product_id, row);
        }
    }

    // All lines validate against the locked stock before the first
    // decrement, so a failing later line leaves every product untouched.
    check_stock(items, &stock)?;

    for item in items {
        sqlx::query("UPDATE products SET quantity_in_stock = quantity_in_stock - $1 WHERE id = $2")
            .bind(item.quantity)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await?;
    }

    let total = order_total(items);
    let (order_id,): (i64,) = sqlx::query_as(
        "INSERT INTO orders (seller_id, total_amount, status, created_at)
         VALUES ($1, $2, 'completed', $3)
         RETURNING id",
    )
    .bind(seller_id)
    .bind(total)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let product_ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();
    let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();
    let prices: Vec<Decimal> = items.iter().map(|i| i.price_at_purchase).collect();
    sqlx::query(
        "INSERT INTO order_items (order_id, product_id, quantity, price_at_purchase)
         SELECT $1, * FROM UNNEST($2::BIGINT[], $3::INT[], $4::NUMERIC[])",
    )
    .bind(order_id)
    .bind(&product_ids)
    .bind(&quantities)
    .bind(&prices)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(OrderWithItems {
        order: Order {
            id: order_id,
            seller_id: seller_id.to_string(),
            total_amount: total,
            status: "completed".to_string(),
            created_at: now,
        },
        items: items
            .iter()
            .map(|i| OrderItem {
                product_id: i.product_id,
                quantity: i.quantity,
                price_at_purchase: i.price_at_purchase,
            })
            .collect(),
    })
}

/// Order history for a seller, newest first, items attached.
pub async fn list_for_seller(
    pool: &PgPool,
    seller_id: &str,
) -> Result<Vec<OrderWithItems>, sqlx::Error> {
    let orders: Vec<Order> = sqlx::query_as(
        "SELECT id, seller_id, total_amount, status, created_at FROM orders
         WHERE seller_id = $1
         ORDER BY created_at DESC, id DESC",
    )
    .bind(seller_id)
    .fetch_all(pool)
    .await?;

    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let rows: Vec<(i64, i64, i32, Decimal)> = sqlx::query_as(
        "SELECT order_id, product_id, quantity, price_at_purchase FROM order_items
         WHERE order_id = ANY($1)
         ORDER BY id",
    )
    .bind(&order_ids)
    .fetch_all(pool)
    .await?;

    let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for (order_id, product_id, quantity, price_at_purchase) in rows {
        items_by_order.entry(order_id).or_default().push(OrderItem {
            product_id,
            quantity,
            price_at_purchase,
        });
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: i64, quantity: i32, price: &str) -> OrderItemCreate {
        OrderItemCreate {
            product_id,
            quantity,
            price_at_purchase: price.parse().unwrap(),
        }
    }

    #[test]
    fn total_sums_quantity_times_price() {
        let items = vec![item(1, 2, "10.50"), item(2, 1, "3.25")];
        assert_eq!(order_total(&items), "24.25".parse::<Decimal>().unwrap());
    }

    #[test]
    fn total_of_no_items_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn total_keeps_cents_exact() {
        // 0.1 + 0.2 style sums stay exact under Decimal
        let items = vec![item(1, 1, "0.10"), item(2, 1, "0.20")];
        assert_eq!(order_total(&items), "0.30".parse::<Decimal>().unwrap());
    }

    fn stock_of(entries: &[(i64, &str, i32)]) -> HashMap<i64, (String, i32)> {
        entries
            .iter()
            .map(|(id, name, qty)| (*id, (name.to_string(), *qty)))
            .collect()
    }

    #[test]
    fn quantity_over_stock_is_rejected() {
        let stock = stock_of(&[(1, "USB Cable", 3)]);
        let err = check_stock(&[item(1, 5, "5.00")], &stock).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("USB Cable"));
        assert!(err.message.contains("Available: 3"));
        assert_eq!(err.details.unwrap().get("available").unwrap(), 3);
    }

    #[test]
    fn one_failing_line_rejects_the_whole_order() {
        // The first line alone would pass; the second must sink both.
        let stock = stock_of(&[(1, "Phone", 10), (2, "Charger", 1)]);
        let items = vec![item(1, 2, "150.00"), item(2, 4, "20.00")];
        let err = check_stock(&items, &stock).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.details.unwrap().get("product_id").unwrap(), 2);
    }

    #[test]
    fn duplicate_lines_are_checked_against_the_running_total() {
        // Each line fits on its own; together they overdraw.
        let stock = stock_of(&[(1, "Case", 3)]);
        let items = vec![item(1, 2, "10.00"), item(1, 2, "10.00")];
        let err = check_stock(&items, &stock).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn unknown_product_is_not_found() {
        let stock = stock_of(&[(1, "Phone", 10)]);
        let err = check_stock(&[item(99, 1, "1.00")], &stock).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }

    #[test]
    fn exact_stock_passes() {
        let stock = stock_of(&[(1, "Phone", 5)]);
        assert!(check_stock(&[item(1, 5, "150.00")], &stock).is_ok());
    }
}
