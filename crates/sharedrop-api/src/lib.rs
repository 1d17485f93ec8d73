//! # sharedrop-api
//!
//! HTTP API layer for ShareDrop built on Axum.
//!
//! Provides the collaboration REST endpoints, the WebSocket upgrade that
//! hands sockets to the realtime engine, request logging, CORS, DTOs and
//! error mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
