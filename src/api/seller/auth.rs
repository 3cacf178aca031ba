//! Password login issuing session tokens

use std::sync::OnceLock;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::ApiResult;
use crate::api::register::{db_error, normalize_email};
use crate::auth::token::create_token;
use crate::db;
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
}

/// A real hash to verify against when the email is unknown, so that path
/// takes as long as a wrong password does.
fn burn_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password("burn").unwrap_or_default())
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = normalize_email(&req.email)?;

    let account = db::accounts::find_by_email(&state.pool, &email)
        .await
        .map_err(db_error)?;

    let Some(account) = account else {
        let _ = verify_password(&req.password, burn_hash());
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    };

    if !verify_password(&req.password, &account.hashed_password) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    // Credentials checked first: an unverified account with a wrong
    // password still reports bad credentials, not its verification state.
    if !account.is_verified {
        return Err(AppError::new(ErrorCode::NotVerified));
    }

    let token = create_token(
        &account.id,
        &account.email,
        &state.jwt_secret,
        state.token_ttl_minutes,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Token signing error");
        AppError::new(ErrorCode::InternalError)
    })?;

    tracing::info!(account_id = %account.id, "Seller logged in");
    Ok(Json(LoginResponse {
        token,
        token_type: "bearer",
    }))
}
