//! Admin retention endpoints

use axum::{Json, extract::State};
use shared::client::{CleanupPreview, CleanupResult};

use crate::auth::AdminUser;
use crate::cleanup;
use crate::error::ServiceResult;
use crate::state::AppState;

/// GET /api/cleanup
pub async fn preview(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ServiceResult<Json<CleanupPreview>> {
    let preview = cleanup::preview(
        &state.pool,
        state.purchase_retention_months,
        shared::util::now_millis(),
    )
    .await?;
    Ok(Json(preview))
}

/// POST /api/cleanup
pub async fn run(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> ServiceResult<Json<CleanupResult>> {
    tracing::info!(admin_id = admin.id, "Manual purchase cleanup");
    let result = cleanup::sweep(
        &state.pool,
        state.purchase_retention_months,
        shared::util::now_millis(),
    )
    .await?;
    Ok(Json(result))
}
