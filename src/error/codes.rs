//! Unified error codes for moko-market
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Account errors
//! - 3xxx: Verification errors
//! - 4xxx: Order errors
//! - 6xxx: Product errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Password too short
    PasswordTooShort = 4,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account email is not verified
    NotVerified = 1005,

    // ==================== 2xxx: Account ====================
    /// Email or phone already belongs to another account
    DuplicateIdentity = 2001,
    /// Account not found
    AccountNotFound = 2002,

    // ==================== 3xxx: Verification ====================
    /// One-time code does not match any live code
    InvalidCode = 3001,
    /// One-time code has expired
    CodeExpired = 3002,
    /// Too many verification attempts
    TooManyAttempts = 3003,
    /// Account is already verified
    AlreadyVerified = 3004,

    // ==================== 4xxx: Order ====================
    /// Order has no line items
    EmptyOrder = 4001,
    /// Order not found
    OrderNotFound = 4002,
    /// Requested quantity exceeds stock
    InsufficientStock = 4003,

    // ==================== 6xxx: Product ====================
    /// Product not found (or not owned by the requesting seller)
    ProductNotFound = 6001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Downstream service unavailable (mailer, storage)
    ServiceUnavailable = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::NotVerified => "Email address is not verified",

            // Account
            ErrorCode::DuplicateIdentity => "Email or phone already registered",
            ErrorCode::AccountNotFound => "Account not found",

            // Verification
            ErrorCode::InvalidCode => "Invalid verification code",
            ErrorCode::CodeExpired => "Verification code has expired",
            ErrorCode::TooManyAttempts => "Too many attempts, request a new code",
            ErrorCode::AlreadyVerified => "Email is already verified",

            // Order
            ErrorCode::EmptyOrder => "Order must have at least one item",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InsufficientStock => "Not enough stock",

            // Product
            ErrorCode::ProductNotFound => "Product not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::PasswordTooShort),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::NotVerified),

            // Account
            2001 => Ok(ErrorCode::DuplicateIdentity),
            2002 => Ok(ErrorCode::AccountNotFound),

            // Verification
            3001 => Ok(ErrorCode::InvalidCode),
            3002 => Ok(ErrorCode::CodeExpired),
            3003 => Ok(ErrorCode::TooManyAttempts),
            3004 => Ok(ErrorCode::AlreadyVerified),

            // Order
            4001 => Ok(ErrorCode::EmptyOrder),
            4002 => Ok(ErrorCode::OrderNotFound),
            4003 => Ok(ErrorCode::InsufficientStock),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ServiceUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);

        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::TokenExpired.code(), 1003);
        assert_eq!(ErrorCode::TokenInvalid.code(), 1004);
        assert_eq!(ErrorCode::NotVerified.code(), 1005);

        assert_eq!(ErrorCode::DuplicateIdentity.code(), 2001);
        assert_eq!(ErrorCode::AccountNotFound.code(), 2002);

        assert_eq!(ErrorCode::InvalidCode.code(), 3001);
        assert_eq!(ErrorCode::CodeExpired.code(), 3002);
        assert_eq!(ErrorCode::TooManyAttempts.code(), 3003);

        assert_eq!(ErrorCode::EmptyOrder.code(), 4001);
        assert_eq!(ErrorCode::InsufficientStock.code(), 4003);
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);

        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::InvalidCredentials,
            ErrorCode::DuplicateIdentity,
            ErrorCode::InvalidCode,
            ErrorCode::InsufficientStock,
            ErrorCode::ProductNotFound,
            ErrorCode::InternalError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(5001), Err(InvalidErrorCode(5001)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_u16() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::InsufficientStock).unwrap(),
            "4003"
        );

        let code: ErrorCode = serde_json::from_str("2001").unwrap();
        assert_eq!(code, ErrorCode::DuplicateIdentity);

        let bad: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(bad.is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(
            ErrorCode::EmptyOrder.message(),
            "Order must have at least one item"
        );
        assert_eq!(ErrorCode::ProductNotFound.message(), "Product not found");
    }
}
