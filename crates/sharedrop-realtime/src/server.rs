//! Top-level real-time engine that ties the hub and adapters together.

use std::fmt::Display;
use std::sync::Arc;

use futures::{Sink, Stream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use sharedrop_core::config::RealtimeConfig;
use sharedrop_core::types::ShareId;

use crate::connection::adapter::{self, AdapterSettings};
use crate::connection::frame::Frame;
use crate::connection::reason::DisconnectReason;
use crate::hub::actor::Hub;
use crate::hub::handle::HubHandle;
use crate::metrics::RealtimeMetrics;

/// Owns the running hub and hands out what connections and HTTP handlers
/// need to reach it.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Entry point to the hub loop.
    pub hub: HubHandle,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    settings: AdapterSettings,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("settings", &self.settings)
            .finish()
    }
}

impl RealtimeEngine {
    /// Start the hub on the current runtime.
    pub fn start(config: &RealtimeConfig) -> Self {
        let metrics = Arc::new(RealtimeMetrics::new());
        let (hub, task) = Hub::spawn(config, metrics.clone());

        info!(
            outbound_queue_size = config.outbound_queue_size,
            ping_interval_seconds = config.ping_interval_seconds,
            pong_wait_seconds = config.pong_wait_seconds,
            "Real-time engine initialized"
        );

        Self {
            hub,
            metrics,
            settings: AdapterSettings::from(config),
            task: Arc::new(Mutex::new(Some(task))),
        }
    }

    /// Run one upgraded connection to completion.
    pub async fn serve_connection<S, R, E>(
        &self,
        share_id: ShareId,
        user: String,
        sink: S,
        stream: R,
    ) -> DisconnectReason
    where
        S: Sink<Frame> + Send + 'static,
        S::Error: Display + Send,
        R: Stream<Item = Result<Frame, E>> + Send,
        E: Display,
    {
        adapter::serve(
            self.hub.clone(),
            self.metrics.clone(),
            self.settings.clone(),
            share_id,
            user,
            sink,
            stream,
        )
        .await
    }

    /// Close every connection queue and wait for the hub loop to exit.
    pub async fn shutdown(&self) {
        info!("Shutting down real-time engine");
        self.hub.shutdown().await;

        if let Some(task) = self.task.lock().await.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Hub task ended abnormally");
            }
        }
        info!("Real-time engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_is_repeatable() {
        let engine = RealtimeEngine::start(&RealtimeConfig::default());
        assert!(engine.hub.is_running());
        engine.shutdown().await;
        engine.shutdown().await;
        assert!(!engine.hub.is_running());
    }
}
