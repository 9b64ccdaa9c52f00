//! Product catalog endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::auth::{AdminUser, CurrentUser};
use crate::db;
use crate::error::internal;
use crate::state::AppState;
use crate::util::non_empty;

use super::ApiResult;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if db::is_unique_violation(&e) {
        AppError::new(ErrorCode::ProductNameExists)
    } else {
        internal(e)
    }
}

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Vec<Product>> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let products = db::products::list(&state.pool, category)
        .await
        .map_err(internal)?;
    Ok(Json(products))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let name = non_empty(&req.name).ok_or_else(|| AppError::required("name"))?;
    if db::products::name_taken(&state.pool, &name, None)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::ProductNameExists));
    }

    let image = req.image.as_deref().and_then(non_empty);
    let category = req.category.as_deref().and_then(non_empty);
    let product = db::products::create(
        &state.pool,
        &name,
        image.as_deref(),
        category.as_deref(),
        shared::util::now_millis(),
    )
    .await
    .map_err(map_write_error)?;

    tracing::info!(product_id = product.id, user_id = user.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<ProductUpdate>,
) -> ApiResult<Product> {
    let name = non_empty(&req.name).ok_or_else(|| AppError::required("name"))?;

    let existing = db::products::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    if name != existing.name
        && db::products::name_taken(&state.pool, &name, Some(id))
            .await
            .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::ProductNameExists));
    }

    let image = req.image.as_deref().and_then(non_empty);
    let category = req.category.as_deref().and_then(non_empty);
    let product = db::products::update(
        &state.pool,
        id,
        &name,
        image.as_deref(),
        category.as_deref(),
    )
    .await
    .map_err(map_write_error)?
    .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    tracing::info!(product_id = id, admin_id = admin.id, "Product updated");
    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    db::products::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    if db::products::has_purchases(&state.pool, id)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::ProductHasPurchases));
    }

    db::products::delete(&state.pool, id)
        .await
        .map_err(internal)?;

    tracing::info!(product_id = id, admin_id = admin.id, "Product deleted");
    Ok(Json(serde_json::json!({ "message": "Product deleted" })))
}
