//! Member Model

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Household member (public profile, never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub name: String,
    /// Login handle, unique
    pub username: String,
    /// Avatar URL
    pub image: Option<String>,
    /// `user` or `admin`
    pub role: String,
    pub created_at: i64,
}

impl Member {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Compact member reference embedded in purchase listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRef {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub image: Option<String>,
}

impl From<&Member> for MemberRef {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            username: m.username.clone(),
            image: m.image.clone(),
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCreate {
    pub name: String,
    pub username: String,
    pub password: String,
    pub image: Option<String>,
}

/// Profile update payload
///
/// `role` is honoured only when the caller is an admin. Changing the password
/// requires `current_password`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub image: Option<String>,
    pub role: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}
