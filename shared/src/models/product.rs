//! Product Model

use serde::{Deserialize, Serialize};

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    /// Unique display name
    pub name: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub created_at: i64,
}

/// Compact product reference embedded in purchase listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub image: Option<String>,
}

impl From<&Product> for ProductRef {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            category: p.category.clone(),
            image: p.image.clone(),
        }
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// Update product payload (full replacement, like create)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub image: Option<String>,
    pub category: Option<String>,
}
