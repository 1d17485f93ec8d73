//! Hub-side record of one live connection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use sharedrop_core::types::{ConnectionId, ShareId};

/// Outcome of a non-blocking enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Enqueued,
    /// The queue is at capacity; the consumer is not keeping up.
    Full,
    /// The writer has gone away.
    Closed,
}

/// A connection as owned by the hub registry.
///
/// Holds the only sender of the connection's bounded outbound queue, so
/// dropping the handle closes the queue exactly once.
#[derive(Debug)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub share_id: ShareId,
    pub user: String,
    /// File the user last reported viewing.
    pub viewing: Option<String>,
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<Arc<str>>,
}

impl ConnectionHandle {
    /// Create a handle and the receiving half of its outbound queue.
    pub fn new(
        share_id: ShareId,
        user: impl Into<String>,
        queue_size: usize,
    ) -> (Self, mpsc::Receiver<Arc<str>>) {
        let (sender, receiver) = mpsc::channel(queue_size.max(1));
        let handle = Self {
            id: ConnectionId::new(),
            share_id,
            user: user.into(),
            viewing: None,
            connected_at: Utc::now(),
            sender,
        };
        (handle, receiver)
    }

    /// Enqueue a serialized event without waiting.
    pub fn try_deliver(&self, payload: &Arc<str>) -> Delivery {
        match self.sender.try_send(Arc::clone(payload)) {
            Ok(()) => Delivery::Enqueued,
            Err(mpsc::error::TrySendError::Full(_)) => Delivery::Full,
            Err(mpsc::error::TrySendError::Closed(_)) => Delivery::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_then_closed() {
        let (handle, mut rx) = ConnectionHandle::new(ShareId::parse("abc123").unwrap(), "ana", 1);
        let payload: Arc<str> = Arc::from("{}");
        assert_eq!(handle.try_deliver(&payload), Delivery::Enqueued);
        assert_eq!(handle.try_deliver(&payload), Delivery::Full);
        assert_eq!(rx.try_recv().unwrap().as_ref(), "{}");
        rx.close();
        assert_eq!(handle.try_deliver(&payload), Delivery::Closed);
    }

    #[test]
    fn test_drop_closes_queue() {
        let (handle, mut rx) = ConnectionHandle::new(ShareId::parse("abc123").unwrap(), "ana", 4);
        drop(handle);
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }
}
