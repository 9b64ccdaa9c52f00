//! Client-related types shared between server and client
//!
//! Common request/response types used in API communication.
//! These types are shared between cave-server and cave-client.

use serde::{Deserialize, Serialize};

use crate::models::{Member, MemberRef};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Member,
}

/// JWT claims carried by every access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Member ID
    pub sub: String,
    pub username: String,
    pub role: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: i64,
    /// Issued at (Unix timestamp seconds)
    pub iat: i64,
}

impl AuthClaims {
    /// Member id parsed from `sub`
    pub fn member_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    pub fn is_admin(&self) -> bool {
        self.role == crate::models::ROLE_ADMIN
    }
}

/// POST /api/verify-token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub user: AuthClaims,
}

// =============================================================================
// Ask the Cave DTOs
// =============================================================================

/// One entry of a caller-supplied purchase history snapshot
///
/// Fields are loose on purpose: entries that cannot be interpreted are
/// skipped by the aggregator instead of failing the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseSnapshot {
    pub user_id: Option<i64>,
    pub product_id: i64,
    pub price: Option<f64>,
    /// RFC 3339 timestamp
    pub purchase_date: Option<String>,
    pub category: Option<String>,
}

/// POST /api/ask-cave request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskCaveRequest {
    pub product_id: i64,
    /// History snapshot; when absent the server reads the stored history
    #[serde(default)]
    pub purchases: Option<Vec<PurchaseSnapshot>>,
}

/// POST /api/ask-cave response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskCaveResponse {
    pub suggested_user: MemberRef,
    pub reason: String,
}

// =============================================================================
// Cleanup DTOs
// =============================================================================

/// Purchase that falls outside the retention window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiredPurchase {
    pub id: i64,
    pub user: String,
    pub username: String,
    pub product: String,
    pub category: Option<String>,
    pub purchase_date: i64,
    pub price: Option<f64>,
}

/// GET /api/cleanup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupPreview {
    pub cutoff_date: i64,
    pub count: usize,
    pub purchases: Vec<ExpiredPurchase>,
}

/// POST /api/cleanup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResult {
    pub deleted_count: u64,
    pub cutoff_date: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_member_id() {
        let claims = AuthClaims {
            sub: "42".into(),
            username: "ana".into(),
            role: "admin".into(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.member_id(), Some(42));
        assert!(claims.is_admin());

        let bad = AuthClaims {
            sub: "not-a-number".into(),
            role: "user".into(),
            ..claims
        };
        assert_eq!(bad.member_id(), None);
        assert!(!bad.is_admin());
    }

    #[test]
    fn test_ask_cave_request_without_snapshot() {
        let req: AskCaveRequest = serde_json::from_str(r#"{"product_id": 3}"#).unwrap();
        assert_eq!(req.product_id, 3);
        assert!(req.purchases.is_none());
    }
}
