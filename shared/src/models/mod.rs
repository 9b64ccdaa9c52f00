//! Data models
//!
//! Shared between cave-server and cave-client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL), all timestamps are Unix millis.

pub mod member;
pub mod product;
pub mod purchase;

// Re-exports
pub use member::*;
pub use product::*;
pub use purchase::*;
