//! POST /api/ask-cave: who should buy this product next

use axum::{Json, extract::State};
use rand::SeedableRng;
use rand::rngs::StdRng;
use shared::client::{AskCaveRequest, AskCaveResponse};
use shared::error::{AppError, ErrorCode};

use crate::auth::CurrentUser;
use crate::db;
use crate::error::ServiceResult;
use crate::nudge::{self, PurchaseRecord};
use crate::state::AppState;

pub async fn ask_cave(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<AskCaveRequest>,
) -> ServiceResult<Json<AskCaveResponse>> {
    let product = db::products::find_by_id(&state.pool, req.product_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    let roster = db::users::list(&state.pool).await?;

    let history: Vec<PurchaseRecord> = match &req.purchases {
        Some(snapshot) => snapshot.iter().map(PurchaseRecord::from).collect(),
        None => db::purchases::list(&state.pool, None)
            .await?
            .iter()
            .map(PurchaseRecord::from)
            .collect(),
    };
    tracing::debug!(
        user_id = user.id,
        product_id = product.id,
        members = roster.len(),
        purchases = history.len(),
        snapshot = req.purchases.is_some(),
        "Ask the Cave"
    );

    let mut rng = StdRng::from_entropy();
    let suggestion = nudge::suggest_contributor(
        &product,
        &roster,
        &history,
        state.generator.as_deref(),
        &mut rng,
        shared::util::now_millis(),
    )
    .await?;

    Ok(Json(AskCaveResponse {
        suggested_user: suggestion.member,
        reason: suggestion.reason,
    }))
}
