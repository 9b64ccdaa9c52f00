//! "Ask the Cave": suggest which member should contribute next
//!
//! The pipeline is aggregate → select → justify:
//! - [`stats::aggregate`] turns the purchase history into per-member statistics
//! - [`selector::select_candidate`] applies the fixed tie-break policy
//! - [`reason::justify`] phrases the result, falling back to a local template

pub mod reason;
pub mod selector;
pub mod stats;

use rand::Rng;
use shared::models::{Member, MemberRef, Product, PurchaseDetail};
use shared::client::PurchaseSnapshot;
use shared::util::parse_rfc3339_millis;
use thiserror::Error;

use crate::genai::TextGenerator;

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// One historical purchase as seen by the engine
///
/// `member_id` and `purchase_date` are optional so that loosely-typed
/// snapshots can be represented; records missing either are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRecord {
    pub member_id: Option<i64>,
    pub product_id: i64,
    pub category: Option<String>,
    pub price: Option<f64>,
    /// Unix millis, `None` when the source date could not be parsed
    pub purchase_date: Option<i64>,
}

impl From<&PurchaseDetail> for PurchaseRecord {
    fn from(p: &PurchaseDetail) -> Self {
        Self {
            member_id: Some(p.user_id),
            product_id: p.product_id,
            category: p.product.category.clone(),
            price: p.price,
            purchase_date: Some(p.purchase_date),
        }
    }
}

impl From<&PurchaseSnapshot> for PurchaseRecord {
    fn from(p: &PurchaseSnapshot) -> Self {
        Self {
            member_id: p.user_id,
            product_id: p.product_id,
            category: p.category.clone(),
            price: p.price,
            purchase_date: p.purchase_date.as_deref().and_then(parse_rfc3339_millis),
        }
    }
}

/// Selected member plus the justification shown to the household
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub member: MemberRef,
    pub reason: String,
}

/// Run the full suggestion pipeline
///
/// Fails only when there is nobody to choose from. Text generation problems are
/// absorbed by the fallback template.
pub async fn suggest_contributor<R>(
    product: &Product,
    roster: &[Member],
    purchases: &[PurchaseRecord],
    generator: Option<&dyn TextGenerator>,
    rng: &mut R,
    now: i64,
) -> Result<Suggestion, SuggestError>
where
    R: Rng + ?Sized,
{
    if roster.is_empty() {
        return Err(SuggestError::InvalidInput(
            "the household has no members".to_string(),
        ));
    }

    let community = stats::aggregate(roster, purchases, now);
    let selected = selector::select_candidate(&community, rng)?;
    tracing::info!(
        product_id = product.id,
        member_id = selected.member.id,
        total = selected.total_purchases,
        recent = selected.recent_purchases,
        "Contributor selected"
    );

    let reason = reason::justify(generator, product, selected, &community, now).await;
    Ok(Suggestion {
        member: selected.member.clone(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::GenAiError;
    use async_trait::async_trait;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use shared::util::DAY_MS;

    const NOW: i64 = 1_717_200_000_000;

    struct Unreachable;

    #[async_trait]
    impl TextGenerator for Unreachable {
        async fn generate(&self, _prompt: &str) -> Result<String, GenAiError> {
            Err(GenAiError::Api {
                status: 503,
                body: "unavailable".into(),
            })
        }
    }

    fn product() -> Product {
        Product {
            id: 5,
            name: "Toilet paper".into(),
            image: None,
            category: None,
            created_at: 0,
        }
    }

    fn member(id: i64, name: &str) -> Member {
        Member {
            id,
            name: name.into(),
            username: name.to_lowercase(),
            image: None,
            role: "user".into(),
            created_at: 1_704_067_200_000,
        }
    }

    #[tokio::test]
    async fn test_empty_roster_is_invalid() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = suggest_contributor(&product(), &[], &[], None, &mut rng, NOW).await;
        assert!(matches!(result, Err(SuggestError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_alice_never_contributed() {
        let roster = vec![member(1, "Alice"), member(2, "Bob")];
        let history: Vec<PurchaseRecord> = [30, 20, 10]
            .into_iter()
            .map(|days| PurchaseRecord {
                member_id: Some(2),
                product_id: 5,
                category: None,
                price: Some(3.0),
                purchase_date: Some(NOW - days * DAY_MS),
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(42);
        let suggestion = suggest_contributor(
            &product(),
            &roster,
            &history,
            Some(&Unreachable),
            &mut rng,
            NOW,
        )
        .await
        .unwrap();

        assert_eq!(suggestion.member.id, 1);
        assert!(suggestion.reason.contains("Alice"));
        assert!(!suggestion.reason.is_empty());
    }

    #[tokio::test]
    async fn test_failed_generation_reports_days() {
        let roster = vec![member(1, "Alice"), member(2, "Bob")];
        let history = vec![
            PurchaseRecord {
                member_id: Some(1),
                product_id: 5,
                category: None,
                price: Some(4.0),
                purchase_date: Some(NOW - 2 * DAY_MS),
            },
            PurchaseRecord {
                member_id: Some(2),
                product_id: 5,
                category: None,
                price: Some(4.0),
                purchase_date: Some(NOW - 45 * DAY_MS),
            },
        ];

        let mut rng = StdRng::seed_from_u64(1);
        let suggestion = suggest_contributor(
            &product(),
            &roster,
            &history,
            Some(&Unreachable),
            &mut rng,
            NOW,
        )
        .await
        .unwrap();

        assert_eq!(suggestion.member.id, 2);
        assert!(suggestion.reason.contains("Bob"));
        assert!(suggestion.reason.contains("45 days"));
    }

    #[test]
    fn test_snapshot_conversion() {
        let snapshot = PurchaseSnapshot {
            user_id: Some(3),
            product_id: 5,
            price: Some(2.5),
            purchase_date: Some("2024-06-01T00:00:00Z".into()),
            category: Some("Home".into()),
        };
        let record = PurchaseRecord::from(&snapshot);
        assert_eq!(record.member_id, Some(3));
        assert_eq!(record.purchase_date, Some(1_717_200_000_000));

        let garbled = PurchaseSnapshot {
            purchase_date: Some("last tuesday".into()),
            ..snapshot
        };
        assert_eq!(PurchaseRecord::from(&garbled).purchase_date, None);
    }
}
