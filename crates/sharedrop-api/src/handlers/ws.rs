//! WebSocket upgrade handler.

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures::future;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info};

use sharedrop_core::error::AppError;
use sharedrop_core::types::ShareId;
use sharedrop_realtime::Frame;

use crate::dto::request::WsQuery;
use crate::error::ApiError;
use crate::handlers::share_id_param;
use crate::state::AppState;

const MAX_USER_NAME_LEN: usize = 64;

/// GET /ws?shareId={id}&userName={name}
///
/// Parameters and the share are checked before the upgrade so a bad link
/// gets a plain HTTP error instead of a socket that closes immediately.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    let share_id = share_id_param(query.share_id.as_deref())?;
    let user = query
        .user_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::validation("userName is required"))?
        .to_string();
    if user.chars().count() > MAX_USER_NAME_LEN {
        return Err(AppError::validation(format!(
            "userName must be at most {MAX_USER_NAME_LEN} characters"
        ))
        .into());
    }

    state.context.require_share(&share_id).await?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let frame_limit = state.config.realtime.socket_frame_limit();
    Ok(ws
        .max_message_size(frame_limit)
        .max_frame_size(frame_limit)
        .on_upgrade(move |socket| handle_ws_connection(state, share_id, user, socket)))
}

/// Hands an established socket to the realtime engine.
async fn handle_ws_connection(state: AppState, share_id: ShareId, user: String, socket: WebSocket) {
    info!(share_id = %share_id, user = %user, "WebSocket connection established");

    let (sink, stream) = socket.split();
    let sink = sink.with(|frame: Frame| {
        future::ready(Ok::<_, axum::Error>(frame_to_message(frame)))
    });
    let stream = stream.filter_map(|msg| future::ready(message_to_frame(msg)));

    let reason = state
        .realtime
        .serve_connection(share_id.clone(), user.clone(), sink, stream)
        .await;

    debug!(
        share_id = %share_id,
        user = %user,
        reason = %reason,
        "WebSocket handler finished"
    );
}

fn frame_to_message(frame: Frame) -> Message {
    match frame {
        Frame::Text(text) => Message::Text(Utf8Bytes::from(text)),
        Frame::Binary(bytes) => Message::Binary(bytes.into()),
        Frame::Ping => Message::Ping(Default::default()),
        Frame::Pong => Message::Pong(Default::default()),
        Frame::Close(code) => Message::Close(code.map(|code| CloseFrame {
            code,
            reason: Utf8Bytes::from_static(""),
        })),
    }
}

/// Maps socket messages onto frames. Binary payloads pass through as
/// bytes and are decoded by the reader.
fn message_to_frame(msg: Result<Message, axum::Error>) -> Option<Result<Frame, axum::Error>> {
    let frame = match msg {
        Ok(Message::Text(text)) => Frame::Text(text.as_str().to_string()),
        Ok(Message::Binary(bytes)) => Frame::Binary(bytes.to_vec()),
        Ok(Message::Ping(_)) => Frame::Ping,
        Ok(Message::Pong(_)) => Frame::Pong,
        Ok(Message::Close(close)) => Frame::Close(close.map(|c| c.code)),
        Err(e) => return Some(Err(e)),
    };
    Some(Ok(frame))
}
