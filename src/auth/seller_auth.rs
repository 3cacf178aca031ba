//! Seller JWT authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::token::validate_token;
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;

/// Authenticated seller identity extracted from the bearer token
#[derive(Debug, Clone)]
pub struct SellerIdentity {
    pub account_id: String,
    pub email: String,
}

/// Middleware that extracts and verifies the seller JWT from the
/// Authorization header.
///
/// Expired and invalid tokens are logged distinctly but both surface to the
/// caller as the same unauthenticated outcome.
pub async fn seller_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated).into_response())?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated).into_response())?;

    let claims = validate_token(token, &state.jwt_secret).map_err(|e| {
        tracing::debug!(code = %e.code, "Token validation failed");
        AppError::new(ErrorCode::NotAuthenticated).into_response()
    })?;

    let identity = SellerIdentity {
        account_id: claims.sub,
        email: claims.email,
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
