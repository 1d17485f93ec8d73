//! Presence handlers.

use axum::Json;
use axum::extract::{Query, State};

use sharedrop_realtime::ActiveUsers;

use crate::dto::request::ActiveUsersQuery;
use crate::error::ApiError;
use crate::handlers::share_id_param;
use crate::state::AppState;

/// GET /api/active-users?shareId=
///
/// Answered by the hub, so the list is consistent with connection
/// registration order.
pub async fn active_users(
    State(state): State<AppState>,
    Query(query): Query<ActiveUsersQuery>,
) -> Result<Json<ActiveUsers>, ApiError> {
    let share_id = share_id_param(query.share_id.as_deref())?;
    let users = state.sessions.active_users(&share_id).await?;
    Ok(Json(users))
}
