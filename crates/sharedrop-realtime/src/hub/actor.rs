//! The hub event loop.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use sharedrop_core::config::RealtimeConfig;
use sharedrop_core::types::ConnectionId;

use super::command::HubCommand;
use super::handle::HubHandle;
use super::registry::SessionRegistry;
use crate::connection::handle::ConnectionHandle;
use crate::message::builder::{build_user_joined, build_user_left};
use crate::message::codec;
use crate::message::types::{Event, EventType};
use crate::metrics::RealtimeMetrics;

/// Single owner of the session registry.
///
/// Never awaits anything but its own inbox, so one slow connection cannot
/// stall fan-out to the rest.
#[derive(Debug)]
pub struct Hub {
    registry: SessionRegistry,
    inbox: mpsc::Receiver<HubCommand>,
    metrics: Arc<RealtimeMetrics>,
    announce_presence: bool,
}

impl Hub {
    /// Spawn the hub loop on the current runtime.
    pub fn spawn(
        config: &RealtimeConfig,
        metrics: Arc<RealtimeMetrics>,
    ) -> (HubHandle, JoinHandle<()>) {
        let (tx, inbox) = mpsc::channel(config.hub_queue_size.max(1));
        let hub = Self {
            registry: SessionRegistry::new(),
            inbox,
            metrics,
            announce_presence: config.announce_presence,
        };
        let task = tokio::spawn(hub.run());
        (HubHandle::new(tx), task)
    }

    /// Process commands until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        info!("Hub started");
        while let Some(command) = self.inbox.recv().await {
            match command {
                HubCommand::Register(conn) => self.register(conn),
                HubCommand::Unregister(id) => self.unregister(id),
                HubCommand::Broadcast { event, origin } => self.broadcast(event, origin),
                HubCommand::ActiveUsers { share_id, reply } => {
                    let _ = reply.send(self.registry.active_users(&share_id));
                }
                HubCommand::Shutdown { done } => {
                    self.close_all();
                    let _ = done.send(());
                    break;
                }
            }
        }
        self.close_all();
        info!("Hub stopped");
    }

    fn register(&mut self, conn: ConnectionHandle) {
        let (id, share_id, user) = (conn.id, conn.share_id.clone(), conn.user.clone());
        if let Err(dup) = self.registry.insert(conn) {
            warn!(
                conn_id = %dup.id,
                share_id = %dup.share_id,
                "Connection registered twice; ignoring"
            );
            return;
        }
        self.metrics.record_connect();
        info!(conn_id = %id, share_id = %share_id, user = %user, "Connection registered");

        if self.announce_presence {
            self.broadcast(build_user_joined(&share_id, &user), Some(id));
        }
    }

    fn unregister(&mut self, id: ConnectionId) {
        let Some(conn) = self.registry.remove(id) else {
            debug!(conn_id = %id, "Unregister for unknown connection");
            return;
        };
        self.metrics.record_disconnect();
        info!(
            conn_id = %id,
            share_id = %conn.share_id,
            user = %conn.user,
            "Connection unregistered"
        );

        let left = self
            .announce_presence
            .then(|| build_user_left(&conn.share_id, &conn.user));
        drop(conn);
        if let Some(event) = left {
            self.broadcast(event, None);
        }
    }

    /// Fan an event out, then announce any evictions it caused.
    fn broadcast(&mut self, event: Event, origin: Option<ConnectionId>) {
        if let Some(id) = origin {
            if !self.registry.contains(id) {
                debug!(conn_id = %id, "Dropping event from unregistered connection");
                return;
            }
            if event.event_type == EventType::UserViewing {
                self.registry.set_viewing(id, event.photo_id.clone());
            }
        }

        let mut pending = VecDeque::from([(event, origin)]);
        while let Some((event, skip)) = pending.pop_front() {
            let payload = match codec::encode(&event) {
                Ok(p) => p,
                Err(e) => {
                    warn!(event_type = %event.event_type, error = %e, "Failed to encode event");
                    continue;
                }
            };

            let fan_out = self.registry.fan_out(&event.share_id, &payload, skip);
            self.metrics.record_broadcast(fan_out.enqueued);

            for conn in fan_out.evicted {
                self.metrics.record_eviction();
                self.metrics.record_disconnect();
                warn!(
                    conn_id = %conn.id,
                    share_id = %conn.share_id,
                    user = %conn.user,
                    "Evicting connection that is not draining its queue"
                );
                if self.announce_presence {
                    pending.push_back((build_user_left(&conn.share_id, &conn.user), None));
                }
            }
        }
    }

    fn close_all(&mut self) {
        let closed = self.registry.clear();
        if closed > 0 {
            self.metrics.record_disconnects(closed);
            info!(connections = closed, "Closed all connection queues");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sharedrop_core::types::ShareId;

    use super::*;
    use crate::message::builder::build_event;

    fn config(announce_presence: bool) -> RealtimeConfig {
        RealtimeConfig {
            announce_presence,
            ..RealtimeConfig::default()
        }
    }

    fn share() -> ShareId {
        ShareId::parse("abc123").unwrap()
    }

    fn spawn(announce_presence: bool) -> (HubHandle, Arc<RealtimeMetrics>) {
        let metrics = Arc::new(RealtimeMetrics::new());
        let (hub, _task) = Hub::spawn(&config(announce_presence), metrics.clone());
        (hub, metrics)
    }

    fn drain(rx: &mut mpsc::Receiver<Arc<str>>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(payload) = rx.try_recv() {
            events.push(serde_json::from_str(&payload).unwrap());
        }
        events
    }

    fn chat(text: &str) -> Event {
        let mut event = build_event(EventType::ChatMessage, &share(), "server");
        event.data = Some(serde_json::json!({ "text": text }));
        event
    }

    #[tokio::test]
    async fn test_broadcast_preserves_order_for_every_member() {
        let (hub, _) = spawn(false);
        let (c1, mut rx1) = ConnectionHandle::new(share(), "ana", 16);
        let (c2, mut rx2) = ConnectionHandle::new(share(), "ben", 16);
        hub.register(c1).await.unwrap();
        hub.register(c2).await.unwrap();

        for text in ["one", "two", "three"] {
            hub.broadcast(chat(text)).await.unwrap();
        }
        hub.active_users(&share()).await.unwrap();

        for rx in [&mut rx1, &mut rx2] {
            let texts: Vec<String> = drain(rx)
                .into_iter()
                .map(|e| e.data.unwrap()["text"].as_str().unwrap().to_string())
                .collect();
            assert_eq!(texts, vec!["one", "two", "three"]);
        }
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let (hub, metrics) = spawn(false);
        let (c1, mut rx1) = ConnectionHandle::new(share(), "ana", 4);
        let (c2, _rx2) = ConnectionHandle::new(share(), "ben", 4);
        let id = c1.id;
        hub.register(c1).await.unwrap();
        hub.register(c2).await.unwrap();

        hub.unregister(id).await;
        let once = hub.active_users(&share()).await.unwrap();
        hub.unregister(id).await;
        let twice = hub.active_users(&share()).await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.count, 1);
        assert_eq!(metrics.snapshot().connections_active, 1);
        assert!(rx1.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_full_queue_is_evicted_and_can_reregister() {
        let (hub, metrics) = spawn(false);
        let (fast, mut fast_rx) = ConnectionHandle::new(share(), "ana", 16);
        let (slow, mut slow_rx) = ConnectionHandle::new(share(), "ben", 1);
        hub.register(fast).await.unwrap();
        hub.register(slow).await.unwrap();

        hub.broadcast(chat("fills")).await.unwrap();
        hub.broadcast(chat("overflows")).await.unwrap();
        hub.broadcast(chat("after")).await.unwrap();
        let users = hub.active_users(&share()).await.unwrap();

        assert_eq!(users.count, 1);
        assert!(!users.contains("ben"));
        assert_eq!(drain(&mut fast_rx).len(), 3);
        let first = slow_rx.recv().await;
        assert!(first.is_some_and(|p| p.contains("fills")));
        assert!(slow_rx.recv().await.is_none());
        assert_eq!(metrics.snapshot().evictions, 1);

        let (again, mut again_rx) = ConnectionHandle::new(share(), "ben", 16);
        hub.register(again).await.unwrap();
        hub.broadcast(chat("welcome back")).await.unwrap();
        let users = hub.active_users(&share()).await.unwrap();
        assert!(users.contains("ben"));
        assert_eq!(drain(&mut again_rx).len(), 1);
    }

    #[tokio::test]
    async fn test_active_users_consistent_under_concurrent_churn() {
        let (hub, _) = spawn(false);
        let mut keep = Vec::new();
        let mut tasks = Vec::new();
        for i in 0..20 {
            let (conn, rx) = ConnectionHandle::new(share(), format!("user{i}"), 4);
            let id = conn.id;
            let hub = hub.clone();
            let leaves = i % 2 == 1;
            if !leaves {
                keep.push(rx);
            }
            tasks.push(tokio::spawn(async move {
                hub.register(conn).await.unwrap();
                let snapshot = hub.active_users(&share()).await.unwrap();
                assert!(snapshot.contains(&format!("user{i}")));
                if leaves {
                    hub.unregister(id).await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let users = hub.active_users(&share()).await.unwrap();
        assert_eq!(users.count, 10);
        for i in (0..20).step_by(2) {
            assert!(users.contains(&format!("user{i}")));
        }
        for i in (1..20).step_by(2) {
            assert!(!users.contains(&format!("user{i}")));
        }
    }

    #[tokio::test]
    async fn test_presence_announcements() {
        let (hub, _) = spawn(true);
        let (c1, mut rx1) = ConnectionHandle::new(share(), "ana", 16);
        let (c2, mut rx2) = ConnectionHandle::new(share(), "ben", 16);
        let c2_id = c2.id;
        hub.register(c1).await.unwrap();
        hub.register(c2).await.unwrap();
        hub.unregister(c2_id).await;
        hub.active_users(&share()).await.unwrap();

        let seen: Vec<(EventType, String)> = drain(&mut rx1)
            .into_iter()
            .map(|e| (e.event_type, e.user))
            .collect();
        assert_eq!(
            seen,
            vec![
                (EventType::UserJoined, "ben".to_string()),
                (EventType::UserLeft, "ben".to_string()),
            ]
        );
        assert!(drain(&mut rx2).is_empty());
    }

    #[tokio::test]
    async fn test_relay_skips_origin_and_tracks_viewing() {
        let (hub, _) = spawn(false);
        let (c1, mut rx1) = ConnectionHandle::new(share(), "ana", 16);
        let (c2, mut rx2) = ConnectionHandle::new(share(), "ben", 16);
        let c1_id = c1.id;
        hub.register(c1).await.unwrap();
        hub.register(c2).await.unwrap();

        let mut viewing = build_event(EventType::UserViewing, &share(), "ana");
        viewing.photo_id = Some("IMG_0042.jpg".into());
        hub.relay(c1_id, viewing).await.unwrap();
        let users = hub.active_users(&share()).await.unwrap();

        assert!(drain(&mut rx1).is_empty());
        assert_eq!(drain(&mut rx2).len(), 1);
        let ana = users.users.iter().find(|u| u.name == "ana").unwrap();
        assert_eq!(ana.viewing.as_deref(), Some("IMG_0042.jpg"));
    }

    #[tokio::test]
    async fn test_register_unregister_cycles_leave_nothing_behind() {
        let (hub, metrics) = spawn(true);
        for _ in 0..50 {
            let (conn, _rx) = ConnectionHandle::new(share(), "ana", 2);
            let id = conn.id;
            hub.register(conn).await.unwrap();
            hub.unregister(id).await;
        }
        let users = hub.active_users(&share()).await.unwrap();
        assert_eq!(users.count, 0);
        let snap = metrics.snapshot();
        assert_eq!(snap.connections_active, 0);
        assert_eq!(snap.connections_total, 50);
    }

    #[tokio::test]
    async fn test_shutdown_closes_queues() {
        let (hub, _) = spawn(false);
        let (c1, mut rx1) = ConnectionHandle::new(share(), "ana", 4);
        hub.register(c1).await.unwrap();
        hub.shutdown().await;

        let closed = tokio::time::timeout(Duration::from_secs(1), rx1.recv())
            .await
            .unwrap();
        assert!(closed.is_none());
        assert!(hub.active_users(&share()).await.is_err());
    }
}
