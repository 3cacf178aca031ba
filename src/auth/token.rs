//! Signed session tokens for seller authentication
//!
//! Tokens are stateless: validity is signature + expiry, no server-side
//! revocation list.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

/// JWT claims for seller authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct SellerClaims {
    /// Account ID
    pub sub: String,
    /// Account email
    pub email: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Create a signed session token for an account
pub fn create_token(
    account_id: &str,
    email: &str,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = SellerClaims {
        sub: account_id.to_string(),
        email: email.to_string(),
        exp: (now + chrono::Duration::minutes(ttl_minutes)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate a session token and return its claims.
///
/// Expired and tampered tokens are distinct `ErrorCode`s so callers can log
/// which one happened; both map to a 401 for the client.
pub fn validate_token(token: &str, secret: &str) -> Result<SellerClaims, AppError> {
    let validation = Validation::default();
    jsonwebtoken::decode::<SellerClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::new(ErrorCode::TokenExpired)
        }
        _ => AppError::new(ErrorCode::TokenInvalid),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn roundtrip() {
        let token = create_token("acc-1", "a@x.com", SECRET, 30).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "acc-1");
        assert_eq!(claims.email, "a@x.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected_even_with_valid_signature() {
        // Negative TTL puts exp well past the default leeway
        let token = create_token("acc-1", "a@x.com", SECRET, -5).unwrap();
        let err = validate_token(&token, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[test]
    fn wrong_secret_is_invalid_not_expired() {
        let token = create_token("acc-1", "a@x.com", SECRET, 30).unwrap();
        let err = validate_token(&token, "other-secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn malformed_token_is_invalid() {
        let err = validate_token("not.a.jwt", SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let token = create_token("acc-1", "a@x.com", SECRET, 30).unwrap();
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut chars: Vec<char> = parts[1].chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        parts[1] = chars.into_iter().collect();
        let err = validate_token(&parts.join("."), SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }
}
