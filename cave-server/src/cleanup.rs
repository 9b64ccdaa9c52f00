//! Purchase retention: drop history older than the retention window

use std::time::Duration;

use shared::client::{CleanupPreview, CleanupResult};
use shared::util::millis_to_rfc3339;
use sqlx::PgPool;

use crate::db;
use crate::util::retention_cutoff;

/// Purchases that a sweep at `now` would delete
pub async fn preview(pool: &PgPool, months: u32, now: i64) -> Result<CleanupPreview, sqlx::Error> {
    let cutoff_date = retention_cutoff(now, months);
    let purchases = db::purchases::list_before(pool, cutoff_date).await?;
    Ok(CleanupPreview {
        cutoff_date,
        count: purchases.len(),
        purchases,
    })
}

/// Delete purchases older than the retention window
pub async fn sweep(pool: &PgPool, months: u32, now: i64) -> Result<CleanupResult, sqlx::Error> {
    let cutoff_date = retention_cutoff(now, months);
    let expired = db::purchases::list_before(pool, cutoff_date).await?;
    for p in &expired {
        tracing::debug!(
            purchase_id = p.id,
            username = %p.username,
            product = %p.product,
            purchase_date = %millis_to_rfc3339(p.purchase_date),
            "Expiring purchase"
        );
    }

    let deleted_count = db::purchases::delete_before(pool, cutoff_date).await?;
    tracing::info!(
        deleted_count,
        cutoff = %millis_to_rfc3339(cutoff_date),
        "Purchase cleanup finished"
    );
    Ok(CleanupResult {
        deleted_count,
        cutoff_date,
    })
}

/// Run [`sweep`] every `interval_hours`; 0 disables the task
pub fn spawn_periodic(pool: PgPool, months: u32, interval_hours: u64) {
    if interval_hours == 0 {
        tracing::info!("Periodic purchase cleanup disabled");
        return;
    }
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_hours * 3600));
        loop {
            interval.tick().await;
            if let Err(e) = sweep(&pool, months, shared::util::now_millis()).await {
                tracing::error!(error = %e, "Periodic purchase cleanup failed");
            }
        }
    });
}
