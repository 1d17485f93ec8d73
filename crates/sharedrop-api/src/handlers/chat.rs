//! Chat handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use validator::Validate;

use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::ChatMessage;

use crate::dto::request::{DeleteChatBody, PostChatBody, ShareQuery};
use crate::dto::response::SuccessResponse;
use crate::error::ApiError;
use crate::handlers::share_id_param;
use crate::state::AppState;

/// POST /api/chat/messages
pub async fn post_message(
    State(state): State<AppState>,
    Json(req): Json<PostChatBody>,
) -> Result<(StatusCode, Json<ChatMessage>), ApiError> {
    req.validate()?;
    let share_id = ShareId::parse(&req.share_id)?;

    let message = state
        .chat
        .post_message(
            &share_id,
            &req.user_name,
            &req.message,
            req.photo_ref.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/chat/messages/get?share_id=
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<ShareQuery>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let share_id = share_id_param(query.share_id.as_deref())?;
    let messages = state.chat.list_messages(&share_id).await?;
    Ok(Json(messages))
}

/// POST /api/chat/messages/delete
pub async fn delete_message(
    State(state): State<AppState>,
    Json(req): Json<DeleteChatBody>,
) -> Result<Json<SuccessResponse>, ApiError> {
    req.validate()?;
    let share_id = ShareId::parse(&req.share_id)?;

    state
        .chat
        .delete_message(&share_id, &req.message_id, &req.user_name)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}
