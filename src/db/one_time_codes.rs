//! One-time verification codes
//!
//! One live code per account, enforced by the primary key: issuing a new
//! code upserts over the old row, so the old code dies atomically with the
//! new one appearing. Codes are stored argon2-hashed.

use sqlx::PgPool;

/// Code lifetime: 10 minutes.
pub const CODE_TTL_MILLIS: i64 = 10 * 60 * 1000;

/// Wrong guesses allowed before the code is burned.
pub const MAX_ATTEMPTS: i32 = 3;

#[derive(Debug, sqlx::FromRow)]
pub struct OneTimeCode {
    pub account_id: String,
    /// Argon2 hash of the 6-digit code
    pub code: String,
    pub attempts: i32,
    pub expires_at: i64,
    pub created_at: i64,
}

/// Issue a code for an account, replacing any previous one and resetting
/// the attempt counter.
pub async fn upsert(
    pool: &PgPool,
    account_id: &str,
    code_hash: &str,
    expires_at: i64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO one_time_codes (account_id, code, attempts, expires_at, created_at)
         VALUES ($1, $2, 0, $3, $4)
         ON CONFLICT (account_id)
         DO UPDATE SET code = $2, attempts = 0, expires_at = $3, created_at = $4",
    )
    .bind(account_id)
    .bind(code_hash)
    .bind(expires_at)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find(pool: &PgPool, account_id: &str) -> Result<Option<OneTimeCode>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM one_time_codes WHERE account_id = $1")
        .bind(account_id)
        .fetch_optional(pool)
        .await
}

/// Count a failed guess against the live code.
pub async fn increment_attempts(pool: &PgPool, account_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE one_time_codes SET attempts = attempts + 1 WHERE account_id = $1")
        .bind(account_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Consume the live code and mark the account verified, atomically.
///
/// `code_hash` must be the exact stored hash the caller just validated
/// against. The delete matches on it, so if a resend swapped in a new code
/// between the caller's read and this delete, zero rows match and the
/// superseded code cannot verify the account.
///
/// Returns `false` when nothing was deleted, either because a concurrent
/// request consumed the code first or because the row was replaced; the
/// caller treats both as an invalid code. Deletion and verification commit
/// or roll back together, so a code can never verify two requests.
pub async fn consume_and_verify(
    pool: &PgPool,
    account_id: &str,
    code_hash: &str,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM one_time_codes WHERE account_id = $1 AND code = $2")
        .bind(account_id)
        .bind(code_hash)
        .execute(&mut *tx)
        .await?;

    if deleted.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query("UPDATE accounts SET is_verified = TRUE, verified_at = $1 WHERE id = $2")
        .bind(now)
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}
