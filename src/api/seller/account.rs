//! Seller profile management

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::api::ApiResult;
use crate::api::register::{db_error, hash_error, normalize_email};
use crate::auth::SellerIdentity;
use crate::db;
use crate::db::accounts::{Account, AccountPatch};
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;
use crate::util::hash_password;

/// Profile as returned to the seller. The password hash stays out.
#[derive(Debug, Serialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub phone: Option<String>,
    pub business_name: String,
    pub location: String,
    pub is_verified: bool,
    pub created_at: i64,
}

impl From<Account> for Profile {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            email: a.email,
            phone: a.phone,
            business_name: a.business_name,
            location: a.location,
            is_verified: a.is_verified,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub location: Option<String>,
    pub password: Option<String>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<SellerIdentity>,
) -> ApiResult<Profile> {
    let account = db::accounts::find_by_id(&state.pool, &identity.account_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;
    Ok(Json(account.into()))
}

/// Partial profile update. Absent fields are untouched; a changed email or
/// phone must not collide with another account.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<SellerIdentity>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Profile> {
    let mut patch = AccountPatch::default();

    if let Some(ref raw) = req.email {
        let email = normalize_email(raw)?;
        if let Some(existing) = db::accounts::find_by_email(&state.pool, &email)
            .await
            .map_err(db_error)?
        {
            if existing.id != identity.account_id {
                return Err(AppError::new(ErrorCode::DuplicateIdentity));
            }
        }
        patch.email = Some(email);
    }

    if let Some(ref raw) = req.phone {
        let phone = raw.trim();
        if phone.is_empty() {
            return Err(AppError::validation("Phone must not be empty"));
        }
        if let Some(existing) = db::accounts::find_by_phone(&state.pool, phone)
            .await
            .map_err(db_error)?
        {
            if existing.id != identity.account_id {
                return Err(AppError::new(ErrorCode::DuplicateIdentity));
            }
        }
        patch.phone = Some(phone.to_string());
    }

    if let Some(ref password) = req.password {
        if password.len() < 8 {
            return Err(AppError::new(ErrorCode::PasswordTooShort));
        }
        patch.hashed_password = Some(hash_password(password).map_err(hash_error)?);
    }

    if let Some(ref name) = req.business_name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Business name must not be empty"));
        }
        patch.business_name = Some(name.trim().to_string());
    }
    if let Some(ref location) = req.location {
        patch.location = Some(location.trim().to_string());
    }

    let updated = db::accounts::apply_patch(&state.pool, &identity.account_id, &patch)
        .await
        .map_err(db_error)?;
    if !updated {
        return Err(AppError::new(ErrorCode::AccountNotFound));
    }

    let account = db::accounts::find_by_id(&state.pool, &identity.account_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;

    tracing::info!(account_id = %identity.account_id, "Profile updated");
    Ok(Json(account.into()))
}

/// Delete the account and all of its products, orders, and codes.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(identity): Extension<SellerIdentity>,
) -> ApiResult<Value> {
    let deleted = db::accounts::delete_cascade(&state.pool, &identity.account_id)
        .await
        .map_err(db_error)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::AccountNotFound));
    }

    tracing::info!(account_id = %identity.account_id, "Account deleted");
    Ok(Json(json!({ "message": "Account deleted" })))
}
