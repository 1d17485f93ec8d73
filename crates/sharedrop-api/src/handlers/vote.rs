//! Vote handlers.

use axum::Json;
use axum::extract::{Query, State};
use validator::Validate;

use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::{Vote, VoteChoice};
use sharedrop_service::VoteListing;

use crate::dto::request::{CastVoteBody, VotesQuery};
use crate::error::ApiError;
use crate::handlers::share_id_param;
use crate::state::AppState;

/// POST /api/votes
pub async fn cast_vote(
    State(state): State<AppState>,
    Json(req): Json<CastVoteBody>,
) -> Result<Json<Vote>, ApiError> {
    req.validate()?;
    let share_id = ShareId::parse(&req.share_id)?;
    let choice: VoteChoice = req.choice.parse()?;

    let vote = state
        .votes
        .cast_vote(&share_id, &req.file_name, &req.user_name, choice)
        .await?;

    Ok(Json(vote))
}

/// GET /api/votes/get?share_id=&file_name=
pub async fn list_votes(
    State(state): State<AppState>,
    Query(query): Query<VotesQuery>,
) -> Result<Json<VoteListing>, ApiError> {
    let share_id = share_id_param(query.share_id.as_deref())?;
    let file = query.file_name.as_deref().filter(|f| !f.is_empty());
    let listing = state.votes.list_votes(&share_id, file).await?;
    Ok(Json(listing))
}
