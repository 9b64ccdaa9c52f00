//! Client-side authentication session
//!
//! Holds the token plus its decoded claims. Expiry is checked locally; the
//! server is asked again at most every [`REVALIDATE_AFTER_MS`].

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use shared::client::AuthClaims;

use crate::{ClientError, ClientResult};

/// Minimum time between two server-side validations
pub const REVALIDATE_AFTER_MS: i64 = 5 * 60 * 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub claims: AuthClaims,
    /// Last successful server validation (Unix millis)
    pub last_validated_at: i64,
}

/// Decode the claims segment of a JWT without verifying the signature
pub fn decode_claims(token: &str) -> ClientResult<AuthClaims> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| ClientError::InvalidResponse("malformed token".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ClientError::InvalidResponse(format!("token payload: {e}")))?;
    Ok(serde_json::from_slice(&bytes)?)
}

impl Session {
    /// Build a session from a freshly issued token
    pub fn from_token(token: impl Into<String>, now: i64) -> ClientResult<Self> {
        let token = token.into();
        let claims = decode_claims(&token)?;
        Ok(Self {
            token,
            claims,
            last_validated_at: now,
        })
    }

    pub fn member_id(&self) -> Option<i64> {
        self.claims.member_id()
    }

    pub fn is_admin(&self) -> bool {
        self.claims.is_admin()
    }

    /// Token `exp` has passed
    pub fn is_expired(&self, now: i64) -> bool {
        self.claims.exp.saturating_mul(1000) <= now
    }

    pub fn needs_revalidation(&self, now: i64) -> bool {
        now - self.last_validated_at >= REVALIDATE_AFTER_MS
    }

    pub fn mark_validated(&mut self, now: i64) {
        self.last_validated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_717_200_000_000;

    fn token_with(exp_secs: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = serde_json::json!({
            "sub": "4",
            "username": "dora",
            "role": "admin",
            "exp": exp_secs,
            "iat": exp_secs - 3600,
        });
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_from_token() {
        let session = Session::from_token(token_with(NOW / 1000 + 60), NOW).unwrap();
        assert_eq!(session.member_id(), Some(4));
        assert_eq!(session.claims.username, "dora");
        assert!(session.is_admin());
        assert_eq!(session.last_validated_at, NOW);
    }

    #[test]
    fn test_malformed_token() {
        assert!(Session::from_token("no-dots-here", NOW).is_err());
        assert!(Session::from_token("a.!!!.c", NOW).is_err());
    }

    #[test]
    fn test_expiry() {
        let session = Session::from_token(token_with(NOW / 1000 + 60), NOW).unwrap();
        assert!(!session.is_expired(NOW));
        assert!(session.is_expired(NOW + 60_000));
    }

    #[test]
    fn test_revalidation_cadence() {
        let mut session = Session::from_token(token_with(NOW / 1000 + 3600), NOW).unwrap();
        assert!(!session.needs_revalidation(NOW + REVALIDATE_AFTER_MS - 1));
        assert!(session.needs_revalidation(NOW + REVALIDATE_AFTER_MS));

        session.mark_validated(NOW + REVALIDATE_AFTER_MS);
        assert!(!session.needs_revalidation(NOW + REVALIDATE_AFTER_MS + 1000));
    }
}
