//! Product catalog persistence

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub seller_id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity_in_stock: i32,
    pub category: String,
    pub subcategory: String,
    pub image_url: Option<String>,
    pub created_at: i64,
}

/// New product payload. Seller id comes from the authenticated identity,
/// never from the body.
#[derive(Debug, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub quantity_in_stock: i32,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    pub image_url: Option<String>,
}

pub async fn create(
    pool: &PgPool,
    seller_id: &str,
    data: &ProductCreate,
    now: i64,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO products
            (seller_id, name, description, price, quantity_in_stock, category, subcategory, image_url, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING *",
    )
    .bind(seller_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.quantity_in_stock)
    .bind(&data.category)
    .bind(&data.subcategory)
    .bind(&data.image_url)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn list_for_seller(pool: &PgPool, seller_id: &str) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE seller_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(seller_id)
        .fetch_all(pool)
        .await
}
