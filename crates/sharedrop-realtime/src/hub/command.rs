//! Messages accepted by the hub loop.

use tokio::sync::oneshot;

use sharedrop_core::types::{ConnectionId, ShareId};

use crate::connection::handle::ConnectionHandle;
use crate::message::types::Event;
use crate::presence::ActiveUsers;

/// One unit of hub work.
#[derive(Debug)]
pub enum HubCommand {
    /// Add a connection to its share.
    Register(ConnectionHandle),
    /// Remove a connection if still present.
    Unregister(ConnectionId),
    /// Fan an event out to its share. When `origin` is set the event came
    /// from that connection and is not echoed back to it.
    Broadcast {
        event: Event,
        origin: Option<ConnectionId>,
    },
    /// Snapshot of the share's live connections.
    ActiveUsers {
        share_id: ShareId,
        reply: oneshot::Sender<ActiveUsers>,
    },
    /// Close every queue and stop the loop.
    Shutdown { done: oneshot::Sender<()> },
}
