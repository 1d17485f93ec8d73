//! Route definitions for the ShareDrop HTTP API.
//!
//! Collaboration routes are mounted under `/api`; the WebSocket endpoint
//! lives at `/ws`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::logging::request_logging;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(share_routes())
        .merge(session_routes())
        .merge(chat_routes())
        .merge(vote_routes())
        .merge(selection_routes())
        .merge(presence_routes())
        .route("/health", get(handlers::health::health));

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = middleware::cors::build_cors_layer(&state.config.server);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/shares", post(handlers::share::create_share))
        .route("/shares/{id}", get(handlers::share::get_share))
}

fn session_routes() -> Router<AppState> {
    Router::new().route(
        "/sessions/validate-name",
        post(handlers::session::validate_name),
    )
}

fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat/messages", post(handlers::chat::post_message))
        .route("/chat/messages/get", get(handlers::chat::list_messages))
        .route(
            "/chat/messages/delete",
            post(handlers::chat::delete_message),
        )
}

fn vote_routes() -> Router<AppState> {
    Router::new()
        .route("/votes", post(handlers::vote::cast_vote))
        .route("/votes/get", get(handlers::vote::list_votes))
}

/// Favorites and tags
fn selection_routes() -> Router<AppState> {
    Router::new()
        .route("/selections", post(handlers::selection::save_selection))
        .route("/selections/get", get(handlers::selection::list_selections))
        .route(
            "/selections/counts",
            get(handlers::selection::favorite_counts),
        )
}

fn presence_routes() -> Router<AppState> {
    Router::new().route("/active-users", get(handlers::presence::active_users))
}
