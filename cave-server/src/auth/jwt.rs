//! JWT token service
//!
//! Issues and validates HS256 access tokens carrying [`AuthClaims`].

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use shared::client::AuthClaims;
use shared::models::Member;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_days: i64,
}

impl JwtService {
    pub fn new(secret: &str, expiry_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_days,
        }
    }

    /// Issue a token for a member
    pub fn generate_token(&self, member: &Member) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = AuthClaims {
            sub: member.id.to_string(),
            username: member.username.clone(),
            role: member.role.clone(),
            exp: (now + Duration::days(self.expiry_days)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Verify signature and expiry, then decode the claims
    pub fn validate_token(&self, token: &str) -> Result<AuthClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp"]);

        decode::<AuthClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim)
    }
}

/// Authenticated caller, built from validated claims
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub claims: AuthClaims,
}

impl TryFrom<AuthClaims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: AuthClaims) -> Result<Self, Self::Error> {
        let id = claims
            .member_id()
            .ok_or_else(|| JwtError::InvalidToken(format!("bad subject {:?}", claims.sub)))?;
        Ok(Self {
            id,
            username: claims.username.clone(),
            role: claims.role.clone(),
            claims,
        })
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.claims.is_admin()
    }

    /// Owner of the resource or an admin
    pub fn can_manage(&self, owner_id: i64) -> bool {
        self.id == owner_id || self.is_admin()
    }
}
