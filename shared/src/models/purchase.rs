//! Purchase Model

use serde::{Deserialize, Serialize};

use super::member::MemberRef;
use super::product::ProductRef;

/// Recorded contribution: one member bought one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub price: Option<f64>,
    pub purchase_date: i64,
    pub created_at: i64,
}

/// Purchase with embedded member and product references (history views)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseDetail {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub price: Option<f64>,
    pub purchase_date: i64,
    pub created_at: i64,
    pub user: MemberRef,
    pub product: ProductRef,
}

/// Create purchase payload (the buyer is the authenticated caller)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseCreate {
    pub product_id: i64,
    pub price: Option<f64>,
}

impl PurchaseCreate {
    /// Zero is treated as "no price", matching how the history is displayed.
    pub fn normalized_price(&self) -> Option<f64> {
        self.price.filter(|p| *p != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_price() {
        let create = |price| PurchaseCreate {
            product_id: 1,
            price,
        };
        assert_eq!(create(None).normalized_price(), None);
        assert_eq!(create(Some(0.0)).normalized_price(), None);
        assert_eq!(create(Some(12.5)).normalized_price(), Some(12.5));
    }
}
