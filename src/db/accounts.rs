//! Seller account persistence

use sqlx::PgPool;

/// Seller account row. `hashed_password` never leaves the db/auth layers.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub phone: Option<String>,
    pub hashed_password: String,
    pub business_name: String,
    pub location: String,
    pub is_verified: bool,
    pub created_at: i64,
    pub verified_at: Option<i64>,
}

/// Partial profile update. `None` fields keep their current value.
#[derive(Debug, Default)]
pub struct AccountPatch {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub location: Option<String>,
    pub hashed_password: Option<String>,
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    id: &str,
    email: &str,
    phone: Option<&str>,
    hashed_password: &str,
    business_name: &str,
    location: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO accounts (id, email, phone, hashed_password, business_name, location, is_verified, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)",
    )
    .bind(id)
    .bind(email)
    .bind(phone)
    .bind(hashed_password)
    .bind(business_name)
    .bind(location)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM accounts WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM accounts WHERE phone = $1")
        .bind(phone)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM accounts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Apply a partial profile update. Provided fields overwrite, absent fields
/// are untouched.
pub async fn apply_patch(
    pool: &PgPool,
    id: &str,
    patch: &AccountPatch,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE accounts SET
            email = COALESCE($1, email),
            phone = COALESCE($2, phone),
            business_name = COALESCE($3, business_name),
            location = COALESCE($4, location),
            hashed_password = COALESCE($5, hashed_password)
         WHERE id = $6",
    )
    .bind(patch.email.as_deref())
    .bind(patch.phone.as_deref())
    .bind(patch.business_name.as_deref())
    .bind(patch.location.as_deref())
    .bind(patch.hashed_password.as_deref())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete an account and everything it owns, in one transaction.
///
/// Order items and one-time codes cascade from their parent tables, but
/// orders and products reference the seller directly and go first.
pub async fn delete_cascade(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM order_items WHERE order_id IN (SELECT id FROM orders WHERE seller_id = $1)",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM orders WHERE seller_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM products WHERE seller_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
