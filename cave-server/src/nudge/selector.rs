//! Candidate selection
//!
//! Members who never contributed are picked first, at random. Otherwise a single
//! left-to-right pass compares each entry with the current best. Spend equality is
//! tolerance-based and therefore not transitive, so the order of the pass matters
//! and no sort is involved.

use rand::Rng;
use rand::seq::SliceRandom;

use super::SuggestError;
use super::stats::{CommunityStats, ContributionStats};

/// Spends closer than this count as equal
pub const SPEND_EPSILON: f64 = 0.01;

pub fn spend_tied(a: f64, b: f64) -> bool {
    (a - b).abs() < SPEND_EPSILON
}

/// Whether `challenger` should replace `best`
fn outranks(challenger: &ContributionStats, best: &ContributionStats) -> bool {
    if challenger.recent_purchases != best.recent_purchases {
        return challenger.recent_purchases < best.recent_purchases;
    }
    let (spend, best_spend) = (challenger.spend(), best.spend());
    if !spend_tied(spend, best_spend) {
        return spend < best_spend;
    }
    challenger.last_activity < best.last_activity
}

/// Pick the member who should contribute next
pub fn select_candidate<'a, R>(
    stats: &'a CommunityStats,
    rng: &mut R,
) -> Result<&'a ContributionStats, SuggestError>
where
    R: Rng + ?Sized,
{
    let entries = stats.entries();
    let Some(first) = entries.first() else {
        return Err(SuggestError::InvalidInput(
            "no members to choose from".to_string(),
        ));
    };

    let never_contributed: Vec<&ContributionStats> =
        entries.iter().filter(|s| !s.has_contributed()).collect();
    if let Some(&pick) = never_contributed.choose(rng) {
        return Ok(pick);
    }

    Ok(entries[1..].iter().fold(first, |best, current| {
        if outranks(current, best) {
            current
        } else {
            best
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nudge::PurchaseRecord;
    use crate::nudge::stats::aggregate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use shared::models::Member;
    use shared::util::DAY_MS;

    const NOW: i64 = 1_717_200_000_000;

    fn member(id: i64, name: &str) -> Member {
        Member {
            id,
            name: name.to_string(),
            username: name.to_lowercase(),
            image: None,
            role: "user".to_string(),
            created_at: 1_704_067_200_000,
        }
    }

    fn bought(member_id: i64, price: f64, days_ago: i64) -> PurchaseRecord {
        PurchaseRecord {
            member_id: Some(member_id),
            product_id: 1,
            category: None,
            price: Some(price),
            purchase_date: Some(NOW - days_ago * DAY_MS),
        }
    }

    fn pick(roster: &[Member], history: &[PurchaseRecord], seed: u64) -> i64 {
        let stats = aggregate(roster, history, NOW);
        let mut rng = StdRng::seed_from_u64(seed);
        select_candidate(&stats, &mut rng).unwrap().member.id
    }

    #[test]
    fn test_spend_tolerance() {
        assert!(spend_tied(50.0, 50.005));
        assert!(spend_tied(0.0, 0.005));
        assert!(!spend_tied(0.0, 0.02));
        assert!(!spend_tied(50.0, 50.025));
        assert!(!spend_tied(100.0, 100.5));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let stats = CommunityStats::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            select_candidate(&stats, &mut rng),
            Err(SuggestError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_never_contributed_member_wins() {
        // Alice has no purchases, Bob bought three things, last one 10 days ago
        let roster = vec![member(1, "Alice"), member(2, "Bob")];
        let history = vec![bought(2, 5.0, 40), bought(2, 5.0, 20), bought(2, 5.0, 10)];
        for seed in 0..20 {
            assert_eq!(pick(&roster, &history, seed), 1);
        }
    }

    #[test]
    fn test_random_pick_stays_within_never_contributed() {
        let roster = vec![member(1, "A"), member(2, "B"), member(3, "C"), member(4, "D")];
        let history = vec![bought(2, 1.0, 1), bought(4, 1.0, 90)];
        let mut seen = std::collections::HashSet::new();
        for seed in 0..64 {
            let id = pick(&roster, &history, seed);
            assert!(id == 1 || id == 3, "picked contributor {id}");
            seen.insert(id);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_same_seed_same_choice() {
        let roster = vec![member(1, "A"), member(2, "B"), member(3, "C")];
        assert_eq!(pick(&roster, &[], 7), pick(&roster, &[], 7));
    }

    #[test]
    fn test_fewest_recent_purchases_wins() {
        let roster = vec![member(1, "A"), member(2, "B"), member(3, "C")];
        let history = vec![
            bought(1, 1.0, 1),
            bought(1, 1.0, 2),
            bought(2, 100.0, 3),
            bought(3, 1.0, 4),
            bought(3, 1.0, 5),
        ];
        assert_eq!(pick(&roster, &history, 0), 2);
    }

    #[test]
    fn test_lower_spend_breaks_recent_tie() {
        let roster = vec![member(1, "A"), member(2, "B")];
        let history = vec![bought(1, 30.0, 60), bought(2, 10.0, 90)];
        // both have zero recent purchases; B spent less despite being older
        assert_eq!(pick(&roster, &history, 0), 2);
    }

    #[test]
    fn test_tied_spend_falls_back_to_older_activity() {
        let roster = vec![member(1, "Alice"), member(2, "Bob")];
        let mut history = Vec::new();
        for d in [40, 45, 50, 55, 60] {
            history.push(bought(1, 10.0, d));
        }
        for d in [35, 36, 37, 38, 70] {
            history.push(bought(2, 10.001, d));
        }
        // spends 50 and 50.005 tie; Alice was last active 40 days ago, Bob 35
        assert_eq!(pick(&roster, &history, 0), 1);

        let roster = vec![member(2, "Bob"), member(1, "Alice")];
        assert_eq!(pick(&roster, &history, 0), 1);
    }

    #[test]
    fn test_small_spend_gap_is_not_a_tie() {
        // Bob spent 0.50 less but was active more recently
        let roster = vec![member(1, "Alice"), member(2, "Bob")];
        let history = vec![bought(1, 100.5, 60), bought(2, 100.0, 40)];
        assert_eq!(pick(&roster, &history, 0), 2);

        let roster = vec![member(2, "Bob"), member(1, "Alice")];
        assert_eq!(pick(&roster, &history, 0), 2);
    }

    #[test]
    fn test_winner_follows_roster_order_across_chained_ties() {
        // A~B and B~C on spend, but A and C are 0.016 apart.
        // Last activity: C oldest, then B, then A.
        let history = vec![bought(1, 10.0, 50), bought(2, 10.008, 60), bought(3, 10.016, 70)];
        let (a, b, c) = (member(1, "A"), member(2, "B"), member(3, "C"));

        // A, then B (tie, older) takes over, then C (tie with B, older) takes over
        let roster = vec![a.clone(), b.clone(), c.clone()];
        assert_eq!(pick(&roster, &history, 0), 3);

        // C holds against B (tie, newer), then A beats C on spend
        let roster = vec![c, b, a];
        assert_eq!(pick(&roster, &history, 0), 1);
    }

    #[test]
    fn test_complete_tie_keeps_first() {
        let roster = vec![member(1, "A"), member(2, "B")];
        let history = vec![bought(1, 5.0, 40), bought(2, 5.0, 40)];
        assert_eq!(pick(&roster, &history, 0), 1);

        let roster = vec![member(2, "B"), member(1, "A")];
        assert_eq!(pick(&roster, &history, 0), 2);
    }
}
