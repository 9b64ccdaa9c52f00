//! Justification text for a suggestion

use shared::models::Product;
use shared::util::days_between;

use super::stats::{CommunityStats, ContributionStats};
use crate::genai::TextGenerator;

fn format_day(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn product_label(product: &Product) -> String {
    match product.category.as_deref().filter(|c| !c.is_empty()) {
        Some(category) => format!("\"{}\" ({category})", product.name),
        None => format!("\"{}\"", product.name),
    }
}

fn describe(stats: &ContributionStats, now: i64) -> String {
    let mut line = format!(
        "- {} (@{}): {} contributions, {} in the last 30 days, average price {:.2}, last activity {} ({} days ago)\n",
        stats.member.name,
        stats.member.username,
        stats.total_purchases,
        stats.recent_purchases,
        stats.average_price,
        format_day(stats.last_activity),
        days_between(stats.last_activity, now),
    );
    if !stats.categories.is_empty() {
        let tally: Vec<String> = stats
            .categories
            .iter()
            .map(|(category, n)| format!("{category}: {n}"))
            .collect();
        line.push_str(&format!("  categories: {}\n", tally.join(", ")));
    }
    line
}

/// Prompt asking the text generator for a short, pointed nudge
pub fn build_prompt(
    product: &Product,
    selected: &ContributionStats,
    community: &CommunityStats,
    now: i64,
) -> String {
    let days = days_between(selected.last_activity, now);
    let name = &selected.member.name;
    let household: String = community
        .entries()
        .iter()
        .map(|stats| describe(stats, now))
        .collect();

    format!(
        "You are a member of the \"Cave\" household and you are TIRED of the same people always paying. \
         Be direct and assertive, like someone telling the truth to a friend's face.\n\
         \n\
         {name} (@{username}) was selected to contribute {label}.\n\
         \n\
         SELECTED MEMBER:\n\
         {selected}\
         \n\
         HOUSEHOLD CONTEXT:\n\
         {household}\
         \n\
         TASK:\n\
         Write a SHORT message (at most 2 sentences) explaining why {name} must contribute \"{product_name}\". \
         Mention {name} by name and say that the last contribution was {days} days ago. \
         Use casual language. Reply with the message only, no JSON or formatting.\n",
        username = selected.member.username,
        label = product_label(product),
        selected = describe(selected, now),
        product_name = product.name,
    )
}

/// Deterministic local reason used whenever generation is unavailable
pub fn fallback_reason(product: &Product, selected: &ContributionStats, now: i64) -> String {
    let name = &selected.member.name;
    if !selected.has_contributed() {
        return format!(
            "{name} has never contributed to the Cave. Time to step up and bring the {}!",
            product.name
        );
    }
    let days = days_between(selected.last_activity, now);
    format!(
        "Enough slacking, {name}! Your last contribution was {days} days ago and your total spend is {:.2}. Time to bring the {}.",
        selected.spend(),
        product.name
    )
}

/// Generated reason when possible, local template otherwise
pub async fn justify(
    generator: Option<&dyn TextGenerator>,
    product: &Product,
    selected: &ContributionStats,
    community: &CommunityStats,
    now: i64,
) -> String {
    let Some(generator) = generator else {
        return fallback_reason(product, selected, now);
    };

    let prompt = build_prompt(product, selected, community, now);
    match generator.generate(&prompt).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!(member_id = selected.member.id, "Generator returned empty text");
            fallback_reason(product, selected, now)
        }
        Err(e) => {
            tracing::warn!(error = %e, member_id = selected.member.id, "Reason generation failed");
            fallback_reason(product, selected, now)
        }
    }
}
