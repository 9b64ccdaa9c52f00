//! Per-member contribution statistics
//!
//! Recomputed from scratch for every suggestion; nothing here is persisted.

use std::collections::{BTreeMap, HashMap};

use shared::models::{Member, MemberRef};
use shared::util::DAY_MS;

use super::PurchaseRecord;

/// Trailing window used for `recent_purchases`
pub const RECENT_WINDOW_MS: i64 = 30 * DAY_MS;

/// Contribution statistics of one member
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionStats {
    pub member: MemberRef,
    pub total_purchases: u32,
    /// Purchases dated within [`RECENT_WINDOW_MS`] of `now`
    pub recent_purchases: u32,
    /// Purchases that carried a price
    pub priced_purchases: u32,
    /// Running mean over priced purchases
    pub average_price: f64,
    /// Latest purchase date, or account creation for members without purchases (millis)
    pub last_activity: i64,
    /// Purchase count per product category
    pub categories: BTreeMap<String, u32>,
    /// Built from history for an id missing from the roster
    pub synthetic: bool,
}

impl ContributionStats {
    fn empty(member: MemberRef, last_activity: i64, synthetic: bool) -> Self {
        Self {
            member,
            total_purchases: 0,
            recent_purchases: 0,
            priced_purchases: 0,
            average_price: 0.0,
            last_activity,
            categories: BTreeMap::new(),
            synthetic,
        }
    }

    /// Total spend estimate: `average_price * total_purchases`
    pub fn spend(&self) -> f64 {
        self.average_price * f64::from(self.total_purchases)
    }

    pub fn has_contributed(&self) -> bool {
        self.total_purchases > 0
    }

    fn record(&mut self, date: i64, price: Option<f64>, category: Option<&str>, now: i64) {
        self.total_purchases += 1;
        if date >= now - RECENT_WINDOW_MS {
            self.recent_purchases += 1;
        }
        if let Some(price) = price {
            self.priced_purchases += 1;
            let n = f64::from(self.priced_purchases);
            self.average_price = (self.average_price * (n - 1.0) + price) / n;
        }
        self.last_activity = self.last_activity.max(date);
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            *self.categories.entry(category.to_string()).or_default() += 1;
        }
    }
}

/// Statistics for the whole household, in roster order
///
/// Synthetic entries for unknown member ids follow the roster in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct CommunityStats {
    entries: Vec<ContributionStats>,
    index: HashMap<i64, usize>,
}

impl CommunityStats {
    pub fn entries(&self) -> &[ContributionStats] {
        &self.entries
    }

    pub fn get(&self, member_id: i64) -> Option<&ContributionStats> {
        self.index.get(&member_id).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, stats: ContributionStats) -> usize {
        let i = self.entries.len();
        self.index.insert(stats.member.id, i);
        self.entries.push(stats);
        i
    }
}

fn placeholder_member(id: i64) -> MemberRef {
    MemberRef {
        id,
        name: format!("Member #{id}"),
        username: format!("member-{id}"),
        image: None,
    }
}

/// Aggregate purchase history into per-member statistics
pub fn aggregate(roster: &[Member], purchases: &[PurchaseRecord], now: i64) -> CommunityStats {
    let mut community = CommunityStats::default();
    for member in roster {
        if community.index.contains_key(&member.id) {
            tracing::warn!(member_id = member.id, "Duplicate roster entry ignored");
            continue;
        }
        community.push(ContributionStats::empty(
            MemberRef::from(member),
            member.created_at,
            false,
        ));
    }

    for record in purchases {
        let Some(member_id) = record.member_id else {
            tracing::warn!(
                product_id = record.product_id,
                "Skipping purchase without member reference"
            );
            continue;
        };
        let Some(date) = record.purchase_date else {
            tracing::warn!(
                member_id,
                product_id = record.product_id,
                "Skipping purchase with unparseable date"
            );
            continue;
        };

        let i = match community.index.get(&member_id) {
            Some(&i) => i,
            None => {
                tracing::debug!(member_id, "Purchase references a member outside the roster");
                community.push(ContributionStats::empty(
                    placeholder_member(member_id),
                    date,
                    true,
                ))
            }
        };
        community.entries[i].record(date, record.price, record.category.as_deref(), now);
    }

    community
}
