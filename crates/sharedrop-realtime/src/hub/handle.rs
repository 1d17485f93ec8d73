//! Cloneable entry point to the hub.

use tokio::sync::{mpsc, oneshot};

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::types::{ConnectionId, ShareId};

use super::command::HubCommand;
use crate::connection::handle::ConnectionHandle;
use crate::message::types::Event;
use crate::presence::ActiveUsers;

/// Sends commands to the hub task. The only way the rest of the
/// application touches the registry.
#[derive(Debug, Clone)]
pub struct HubHandle {
    tx: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    pub(crate) fn new(tx: mpsc::Sender<HubCommand>) -> Self {
        Self { tx }
    }

    async fn send(&self, command: HubCommand) -> AppResult<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| AppError::service_unavailable("Realtime hub is not running"))
    }

    /// Add a connection to its share's set.
    pub async fn register(&self, conn: ConnectionHandle) -> AppResult<()> {
        self.send(HubCommand::Register(conn)).await
    }

    /// Remove a connection. No-op when it is already gone or the hub has
    /// stopped.
    pub async fn unregister(&self, id: ConnectionId) {
        let _ = self.send(HubCommand::Unregister(id)).await;
    }

    /// Deliver a server-originated event to every connection of its share.
    pub async fn broadcast(&self, event: Event) -> AppResult<()> {
        self.send(HubCommand::Broadcast {
            event,
            origin: None,
        })
        .await
    }

    /// Relay a client event to the other connections of its share.
    pub async fn relay(&self, origin: ConnectionId, event: Event) -> AppResult<()> {
        self.send(HubCommand::Broadcast {
            event,
            origin: Some(origin),
        })
        .await
    }

    /// Live users of a share, ordered by connection time.
    pub async fn active_users(&self, share_id: &ShareId) -> AppResult<ActiveUsers> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::ActiveUsers {
            share_id: share_id.clone(),
            reply,
        })
        .await?;
        rx.await
            .map_err(|_| AppError::service_unavailable("Realtime hub stopped before replying"))
    }

    /// Close every queue and stop the hub loop.
    pub async fn shutdown(&self) {
        let (done, rx) = oneshot::channel();
        if self.send(HubCommand::Shutdown { done }).await.is_ok() {
            let _ = rx.await;
        }
    }

    /// Whether the hub loop is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }
}
