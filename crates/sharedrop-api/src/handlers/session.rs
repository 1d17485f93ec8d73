//! Display name claims.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::Validate;

use sharedrop_core::types::ShareId;
use sharedrop_service::NameClaim;

use crate::dto::request::ValidateNameBody;
use crate::dto::response::NameClaimResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/sessions/validate-name
///
/// 200 when the name is now the caller's, 409 with two alternatives when
/// someone already holds it.
pub async fn validate_name(
    State(state): State<AppState>,
    Json(req): Json<ValidateNameBody>,
) -> Result<Response, ApiError> {
    req.validate()?;
    let share_id = ShareId::parse(&req.share_id)?;

    let response = match state.sessions.claim_name(&share_id, &req.user_name).await? {
        NameClaim::Claimed { .. } => (
            StatusCode::OK,
            Json(NameClaimResponse {
                success: true,
                message: Some("Name claimed successfully".to_string()),
                error: None,
                suggestions: Vec::new(),
            }),
        ),
        NameClaim::Taken {
            user_name,
            suggestions,
        } => (
            StatusCode::CONFLICT,
            Json(NameClaimResponse {
                success: false,
                message: None,
                error: Some(format!(
                    "Name '{user_name}' is already taken in this session. \
                     Please choose another name."
                )),
                suggestions: suggestions.to_vec(),
            }),
        ),
    };

    Ok(response.into_response())
}
