//! Favorite and tag selection handlers.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Query, State};
use validator::Validate;

use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::PhotoSelection;
use sharedrop_realtime::query::FavoriteCount;

use crate::dto::request::{SaveSelectionBody, ShareQuery};
use crate::error::ApiError;
use crate::handlers::share_id_param;
use crate::state::AppState;

/// POST /api/selections
pub async fn save_selection(
    State(state): State<AppState>,
    Json(req): Json<SaveSelectionBody>,
) -> Result<Json<PhotoSelection>, ApiError> {
    req.validate()?;
    let share_id = ShareId::parse(&req.share_id)?;

    let selection = state
        .selections
        .save_selection(
            &share_id,
            &req.file_name,
            &req.user_name,
            req.is_favorite,
            req.tags,
        )
        .await?;

    Ok(Json(selection))
}

/// GET /api/selections/get?share_id=
pub async fn list_selections(
    State(state): State<AppState>,
    Query(query): Query<ShareQuery>,
) -> Result<Json<Vec<PhotoSelection>>, ApiError> {
    let share_id = share_id_param(query.share_id.as_deref())?;
    let selections = state.selections.list_selections(&share_id).await?;
    Ok(Json(selections))
}

/// GET /api/selections/counts?share_id=
pub async fn favorite_counts(
    State(state): State<AppState>,
    Query(query): Query<ShareQuery>,
) -> Result<Json<BTreeMap<String, FavoriteCount>>, ApiError> {
    let share_id = share_id_param(query.share_id.as_deref())?;
    let counts = state.selections.favorite_counts(&share_id).await?;
    Ok(Json(counts))
}
