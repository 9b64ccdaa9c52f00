//! Unified error codes for The Cave
//!
//! This module defines all error codes used by cave-server and cave-client.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Member errors
//! - 4xxx: Product errors
//! - 5xxx: Purchase errors
//! - 6xxx: Suggestion errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Required field missing
    RequiredField = 7,
    /// Too many requests from the same client
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Member ====================
    /// Member not found
    MemberNotFound = 3001,
    /// Username already taken
    UsernameExists = 3002,
    /// Password too short
    PasswordTooShort = 3003,
    /// Current password missing or incorrect
    CurrentPasswordInvalid = 3004,

    // ==================== 4xxx: Product ====================
    /// Product not found
    ProductNotFound = 4001,
    /// Product name already exists
    ProductNameExists = 4002,
    /// Product still referenced by purchases
    ProductHasPurchases = 4003,

    // ==================== 5xxx: Purchase ====================
    /// Purchase not found
    PurchaseNotFound = 5001,
    /// Purchase price is invalid
    PurchaseInvalidPrice = 5002,

    // ==================== 6xxx: Suggestion ====================
    /// No household member available to suggest
    NoCandidates = 6001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Member
            ErrorCode::MemberNotFound => "Member not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",
            ErrorCode::CurrentPasswordInvalid => "Current password is missing or incorrect",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductNameExists => "A product with this name already exists",
            ErrorCode::ProductHasPurchases => "Product has associated purchases",

            // Purchase
            ErrorCode::PurchaseNotFound => "Purchase not found",
            ErrorCode::PurchaseInvalidPrice => "Purchase price must be a non-negative number",

            // Suggestion
            ErrorCode::NoCandidates => "No household member available for a suggestion",

            // System
            ErrorCode::InternalError => "Internal server error",
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
            2 => Ok(ErrorCode::ValidationFailed),
            7 => Ok(ErrorCode::RequiredField),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Member
            3001 => Ok(ErrorCode::MemberNotFound),
            3002 => Ok(ErrorCode::UsernameExists),
            3003 => Ok(ErrorCode::PasswordTooShort),
            3004 => Ok(ErrorCode::CurrentPasswordInvalid),

            // Product
            4001 => Ok(ErrorCode::ProductNotFound),
            4002 => Ok(ErrorCode::ProductNameExists),
            4003 => Ok(ErrorCode::ProductHasPurchases),

            // Purchase
            5001 => Ok(ErrorCode::PurchaseNotFound),
            5002 => Ok(ErrorCode::PurchaseInvalidPrice),

            // Suggestion
            6001 => Ok(ErrorCode::NoCandidates),

            // System
            9001 => Ok(ErrorCode::InternalError),

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
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::UsernameExists.code(), 3002);
        assert_eq!(ErrorCode::ProductHasPurchases.code(), 4003);
        assert_eq!(ErrorCode::PurchaseNotFound.code(), 5001);
        assert_eq!(ErrorCode::NoCandidates.code(), 6001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_roundtrip_all_known() {
        let all = [
            ErrorCode::ValidationFailed,
            ErrorCode::RequiredField,
            ErrorCode::TooManyRequests,
            ErrorCode::NotAuthenticated,
            ErrorCode::InvalidCredentials,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::PermissionDenied,
            ErrorCode::AdminRequired,
            ErrorCode::MemberNotFound,
            ErrorCode::UsernameExists,
            ErrorCode::PasswordTooShort,
            ErrorCode::CurrentPasswordInvalid,
            ErrorCode::ProductNotFound,
            ErrorCode::ProductNameExists,
            ErrorCode::ProductHasPurchases,
            ErrorCode::PurchaseNotFound,
            ErrorCode::PurchaseInvalidPrice,
            ErrorCode::NoCandidates,
            ErrorCode::InternalError,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
            assert!(!code.message().is_empty());
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(65535), Err(InvalidErrorCode(65535)));
        assert_eq!(
            InvalidErrorCode(42).to_string(),
            "invalid error code: 42"
        );
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::ProductNotFound).unwrap();
        assert_eq!(json, "4001");
        let code: ErrorCode = serde_json::from_str("3002").unwrap();
        assert_eq!(code, ErrorCode::UsernameExists);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::NoCandidates.to_string(), "6001");
    }
}
