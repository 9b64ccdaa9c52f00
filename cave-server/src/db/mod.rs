//! Database access layer

pub mod products;
pub mod purchases;
pub mod users;

/// Unique constraint violation (e.g. a concurrent insert won the race)
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
