//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use sharedrop_core::config::AppConfig;
use sharedrop_database::CollabStore;
use sharedrop_realtime::RealtimeEngine;
use sharedrop_service::{
    ChatService, SelectionService, ServiceContext, SessionService, ShareService, VoteService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Realtime engine (hub handle and metrics)
    pub realtime: RealtimeEngine,
    /// Store plus hub, for share checks outside a service
    pub context: ServiceContext,
    pub shares: Arc<ShareService>,
    pub sessions: Arc<SessionService>,
    pub chat: Arc<ChatService>,
    pub votes: Arc<VoteService>,
    pub selections: Arc<SelectionService>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wire every service over one store and one running engine.
    pub fn new(config: AppConfig, store: Arc<dyn CollabStore>, realtime: RealtimeEngine) -> Self {
        let context = ServiceContext::new(store, realtime.hub.clone());
        Self {
            shares: Arc::new(ShareService::new(context.clone())),
            sessions: Arc::new(SessionService::new(context.clone(), config.session.clone())),
            chat: Arc::new(ChatService::new(context.clone())),
            votes: Arc::new(VoteService::new(context.clone())),
            selections: Arc::new(SelectionService::new(context.clone())),
            config: Arc::new(config),
            realtime,
            context,
            started_at: Instant::now(),
        }
    }
}
