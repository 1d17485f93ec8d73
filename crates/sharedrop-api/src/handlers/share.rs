//! Share creation and lookup handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use sharedrop_core::types::ShareId;
use sharedrop_entity::share::Share;
use sharedrop_service::CreateShareRequest;

use crate::dto::request::CreateShareBody;
use crate::dto::response::ShareResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    Json(req): Json<CreateShareBody>,
) -> Result<(StatusCode, Json<ShareResponse>), ApiError> {
    req.validate()?;

    let (share, session) = state
        .shares
        .create_share(CreateShareRequest {
            folder_path: req.folder_path,
            password: req.password,
            session_name: req.session_name,
            allow_multiple: req.allow_multiple,
            expires_in_hours: req.expires_in_hours,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ShareResponse { share, session }),
    ))
}

/// GET /api/shares/{id}
pub async fn get_share(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Share>, ApiError> {
    let share_id = ShareId::parse(&id)?;
    let share = state.shares.get_share(&share_id).await?;
    Ok(Json(share))
}
