//! Signup and email verification

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db;
use crate::db::one_time_codes::{CODE_TTL_MILLIS, MAX_ATTEMPTS};
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;
use crate::util::{generate_code, hash_password, now_millis, verify_password};

use super::ApiResult;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub business_name: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendCodeRequest {
    pub email: String,
}

/// Create an unverified account and send the first verification code.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Value> {
    let email = normalize_email(&req.email)?;
    let phone = req
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    if req.password.len() < 8 {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if req.business_name.trim().is_empty() {
        return Err(AppError::validation("Business name must not be empty"));
    }

    // The unique constraints are the real guard; this precheck just turns
    // the common case into a friendly error instead of a DB failure.
    if db::accounts::find_by_email(&state.pool, &email)
        .await
        .map_err(db_error)?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::DuplicateIdentity));
    }
    if let Some(ref phone) = phone {
        if db::accounts::find_by_phone(&state.pool, phone)
            .await
            .map_err(db_error)?
            .is_some()
        {
            return Err(AppError::new(ErrorCode::DuplicateIdentity));
        }
    }

    let hashed = hash_password(&req.password).map_err(hash_error)?;
    let account_id = uuid::Uuid::new_v4().to_string();
    let now = now_millis();

    db::accounts::create(
        &state.pool,
        &account_id,
        &email,
        phone.as_deref(),
        &hashed,
        req.business_name.trim(),
        req.location.trim(),
        now,
    )
    .await
    .map_err(db_error)?;

    tracing::info!(%account_id, "Account created");
    issue_code(&state, &account_id, &email, now).await?;

    Ok(Json(json!({
        "account_id": account_id,
        "message": "Verification code sent to your email",
    })))
}

/// Check a submitted code, consume it, and mark the account verified.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> ApiResult<Value> {
    let email = normalize_email(&req.email)?;
    let now = now_millis();

    // An unknown email reports the same error as a wrong code; this
    // endpoint never confirms whether an address is registered.
    let account = db::accounts::find_by_email(&state.pool, &email)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCode))?;

    if account.is_verified {
        return Err(AppError::new(ErrorCode::AlreadyVerified));
    }

    let record = db::one_time_codes::find(&state.pool, &account.id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCode))?;

    if now > record.expires_at {
        return Err(AppError::new(ErrorCode::CodeExpired));
    }
    if record.attempts >= MAX_ATTEMPTS {
        return Err(AppError::new(ErrorCode::TooManyAttempts));
    }

    if !verify_password(&req.code, &record.code) {
        db::one_time_codes::increment_attempts(&state.pool, &account.id)
            .await
            .map_err(db_error)?;
        return Err(AppError::new(ErrorCode::InvalidCode));
    }

    // Consumption matches on the exact hash we just verified, so a code
    // replaced by a concurrent resend cannot be consumed here.
    let consumed =
        db::one_time_codes::consume_and_verify(&state.pool, &account.id, &record.code, now)
            .await
            .map_err(db_error)?;
    if !consumed {
        // The code row was consumed or replaced between our read and the
        // delete. Only one caller wins, and only with the current code.
        return Err(AppError::new(ErrorCode::InvalidCode));
    }

    tracing::info!(account_id = %account.id, "Account verified");
    Ok(Json(json!({ "verified": true })))
}

/// Re-issue the verification code for a not-yet-verified account. The new
/// code replaces the old one.
pub async fn resend_code(
    State(state): State<AppState>,
    Json(req): Json<ResendCodeRequest>,
) -> ApiResult<Value> {
    let email = normalize_email(&req.email)?;

    // An unknown email gets the same response as a known one; like
    // verification, this endpoint never confirms whether an address is
    // registered. Nothing is issued or sent in that case.
    let account = db::accounts::find_by_email(&state.pool, &email)
        .await
        .map_err(db_error)?;

    match account {
        Some(account) if account.is_verified => {
            return Err(AppError::new(ErrorCode::AlreadyVerified));
        }
        Some(account) => {
            issue_code(&state, &account.id, &email, now_millis()).await?;
        }
        None => {
            tracing::debug!("Resend requested for unregistered email");
        }
    }

    Ok(Json(json!({ "message": "Verification code sent to your email" })))
}

/// Generate, store, and mail a fresh code. A failed email send is logged
/// but does not fail the request; the account and code rows stay committed
/// and the caller can ask for a resend.
async fn issue_code(
    state: &AppState,
    account_id: &str,
    email: &str,
    now: i64,
) -> Result<(), AppError> {
    let code = generate_code();
    let code_hash = hash_password(&code).map_err(hash_error)?;

    db::one_time_codes::upsert(
        &state.pool,
        account_id,
        &code_hash,
        now + CODE_TTL_MILLIS,
        now,
    )
    .await
    .map_err(db_error)?;

    if let Err(e) = state.email.send_verification_code(email, &code).await {
        tracing::warn!(error = %e, account_id, "Failed to send verification email");
    }
    Ok(())
}

pub(super) fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("Invalid email address"));
    }
    Ok(email)
}

pub(super) fn db_error(e: sqlx::Error) -> AppError {
    tracing::error!(error = %e, "Database error");
    AppError::new(ErrorCode::InternalError)
}

pub(super) fn hash_error(e: argon2::password_hash::Error) -> AppError {
    tracing::error!(error = %e, "Password hashing error");
    AppError::new(ErrorCode::InternalError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Seller@Example.COM ").unwrap(),
            "seller@example.com"
        );
    }

    #[test]
    fn email_without_at_is_rejected() {
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("   ").is_err());
    }
}
