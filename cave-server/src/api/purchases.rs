//! Purchase history endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{PurchaseCreate, PurchaseDetail};

use crate::auth::CurrentUser;
use crate::db;
use crate::error::internal;
use crate::state::AppState;

use super::ApiResult;

#[derive(Debug, Deserialize)]
pub struct PurchaseQuery {
    pub user_id: Option<i64>,
}

/// GET /api/purchases
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PurchaseQuery>,
) -> ApiResult<Vec<PurchaseDetail>> {
    let purchases = db::purchases::list(&state.pool, query.user_id)
        .await
        .map_err(internal)?;
    Ok(Json(purchases))
}

/// POST /api/purchases
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<PurchaseCreate>,
) -> Result<(StatusCode, Json<PurchaseDetail>), AppError> {
    let price = req.normalized_price();
    if price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        return Err(AppError::new(ErrorCode::PurchaseInvalidPrice).with_detail("field", "price"));
    }

    db::products::find_by_id(&state.pool, req.product_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    let purchase = db::purchases::create(
        &state.pool,
        user.id,
        req.product_id,
        price,
        shared::util::now_millis(),
    )
    .await
    .map_err(internal)?;

    let detail = db::purchases::find_detail(&state.pool, purchase.id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::PurchaseNotFound))?;

    tracing::info!(
        purchase_id = purchase.id,
        user_id = user.id,
        product_id = req.product_id,
        "Purchase recorded"
    );
    Ok((StatusCode::CREATED, Json(detail)))
}

/// DELETE /api/purchases/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let purchase = db::purchases::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::PurchaseNotFound))?;

    if !user.can_manage(purchase.user_id) {
        return Err(AppError::forbidden(
            "You do not have permission to delete this purchase",
        ));
    }

    db::purchases::delete(&state.pool, id)
        .await
        .map_err(internal)?;

    tracing::info!(purchase_id = id, user_id = user.id, "Purchase deleted");
    Ok(Json(serde_json::json!({ "message": "Purchase deleted" })))
}
