//! Bridges one duplex transport to the hub.
//!
//! Each connection runs a reader (inbound frames → hub) and a writer
//! (outbound queue → transport, plus heartbeat pings). Either side ending
//! tears down both: the writer cancels the reader on failure, and the
//! reader unregisters from the hub, which closes the writer's queue.

use std::fmt::Display;
use std::pin::{Pin, pin};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sharedrop_core::config::RealtimeConfig;
use sharedrop_core::types::{ConnectionId, ShareId};

use super::frame::{CLOSE_GOING_AWAY, CLOSE_NORMAL, Frame};
use super::handle::ConnectionHandle;
use super::reason::DisconnectReason;
use crate::hub::handle::HubHandle;
use crate::message::codec;
use crate::metrics::RealtimeMetrics;

/// Timing and sizing knobs for one connection.
#[derive(Debug, Clone)]
pub struct AdapterSettings {
    /// Inbound read deadline, refreshed by each pong.
    pub pong_wait: Duration,
    /// Interval between heartbeat pings.
    pub ping_interval: Duration,
    /// Deadline for every outbound write.
    pub write_wait: Duration,
    /// Largest accepted inbound text frame, in bytes.
    pub max_message_size: usize,
    /// Capacity of the outbound queue.
    pub outbound_queue_size: usize,
}

impl From<&RealtimeConfig> for AdapterSettings {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            pong_wait: config.pong_wait(),
            ping_interval: config.ping_interval(),
            write_wait: config.write_wait(),
            max_message_size: config.max_message_size,
            outbound_queue_size: config.outbound_queue_size,
        }
    }
}

/// Who a reader speaks for.
#[derive(Debug, Clone)]
struct Identity {
    id: ConnectionId,
    share_id: ShareId,
    user: String,
}

/// Register a connection and run it until either half ends.
///
/// Returns once the connection is unregistered and the writer has
/// finished.
pub async fn serve<S, R, E>(
    hub: HubHandle,
    metrics: Arc<RealtimeMetrics>,
    settings: AdapterSettings,
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
    let (conn, queue) = ConnectionHandle::new(
        share_id.clone(),
        user.clone(),
        settings.outbound_queue_size,
    );
    let identity = Identity {
        id: conn.id,
        share_id,
        user,
    };

    if hub.register(conn).await.is_err() {
        let mut sink = pin!(sink);
        let close = Frame::Close(Some(CLOSE_GOING_AWAY));
        let _ = write_frame(&mut sink, close, settings.write_wait).await;
        warn!(
            share_id = %identity.share_id,
            user = %identity.user,
            "Hub unavailable; refusing connection"
        );
        return DisconnectReason::Shutdown;
    }

    let cancel = CancellationToken::new();
    let writer = tokio::spawn(write_loop(sink, queue, settings.clone(), cancel.clone()));

    let read_reason = read_loop(stream, &hub, &metrics, &settings, &identity, &cancel).await;
    hub.unregister(identity.id).await;
    cancel.cancel();

    let write_reason = match writer.await {
        Ok(reason) => reason,
        Err(e) => DisconnectReason::WriteFailed(e.to_string()),
    };
    let reason = if read_reason == DisconnectReason::Cancelled {
        write_reason
    } else {
        read_reason
    };

    if reason.is_error() {
        warn!(
            conn_id = %identity.id,
            share_id = %identity.share_id,
            user = %identity.user,
            reason = %reason,
            "Connection closed"
        );
    } else {
        debug!(
            conn_id = %identity.id,
            share_id = %identity.share_id,
            user = %identity.user,
            reason = %reason,
            "Connection closed"
        );
    }
    reason
}

async fn read_loop<R, E>(
    stream: R,
    hub: &HubHandle,
    metrics: &RealtimeMetrics,
    settings: &AdapterSettings,
    conn: &Identity,
    cancel: &CancellationToken,
) -> DisconnectReason
where
    R: Stream<Item = Result<Frame, E>>,
    E: Display,
{
    let mut stream = pin!(stream);
    let mut deadline = Instant::now() + settings.pong_wait;

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => return DisconnectReason::Cancelled,
            next = tokio::time::timeout_at(deadline, stream.next()) => next,
        };

        let frame = match next {
            Err(_) => return DisconnectReason::ReadDeadline,
            Ok(None) => return DisconnectReason::StreamEnded,
            Ok(Some(Err(e))) => return DisconnectReason::ReadFailed(e.to_string()),
            Ok(Some(Ok(frame))) => frame,
        };

        let decoded = match frame {
            Frame::Pong => {
                deadline = Instant::now() + settings.pong_wait;
                continue;
            }
            Frame::Ping => continue,
            Frame::Close(code) => return DisconnectReason::from_close(code),
            Frame::Text(text) => codec::decode_inbound(&text, settings.max_message_size),
            Frame::Binary(bytes) => codec::decode_inbound_bytes(&bytes, settings.max_message_size),
        };

        match decoded {
            Ok(inbound) => {
                metrics.record_received();
                let event =
                    inbound.into_event(conn.share_id.clone(), conn.user.clone(), Utc::now());
                if hub.relay(conn.id, event).await.is_err() {
                    return DisconnectReason::Shutdown;
                }
            }
            Err(e) => {
                metrics.record_malformed();
                warn!(
                    conn_id = %conn.id,
                    share_id = %conn.share_id,
                    error = %e,
                    "Discarding inbound frame"
                );
            }
        }
    }
}

pub(crate) async fn write_loop<S>(
    sink: S,
    mut queue: mpsc::Receiver<Arc<str>>,
    settings: AdapterSettings,
    cancel: CancellationToken,
) -> DisconnectReason
where
    S: Sink<Frame>,
    S::Error: Display,
{
    let mut sink = pin!(sink);
    let first_ping = Instant::now() + settings.ping_interval;
    let mut heartbeat = tokio::time::interval_at(first_ping, settings.ping_interval);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let reason = loop {
        let written = tokio::select! {
            item = queue.recv() => match item {
                Some(first) => {
                    let batch = drain_batch(first, &mut queue, settings.outbound_queue_size);
                    write_frame(&mut sink, Frame::Text(batch), settings.write_wait).await
                }
                None => break DisconnectReason::QueueClosed,
            },
            _ = heartbeat.tick() => write_frame(&mut sink, Frame::Ping, settings.write_wait).await,
            _ = cancel.cancelled() => break DisconnectReason::Cancelled,
        };

        if let Err(reason) = written {
            cancel.cancel();
            return reason;
        }
    };

    let close = Frame::Close(Some(CLOSE_NORMAL));
    let _ = write_frame(&mut sink, close, settings.write_wait).await;
    cancel.cancel();
    reason
}

/// Join the first queued payload with whatever else is already waiting.
fn drain_batch(first: Arc<str>, queue: &mut mpsc::Receiver<Arc<str>>, limit: usize) -> String {
    let mut batch = String::from(&*first);
    for _ in 1..limit.max(1) {
        match queue.try_recv() {
            Ok(next) => {
                batch.push('\n');
                batch.push_str(&next);
            }
            Err(_) => break,
        }
    }
    batch
}

async fn write_frame<S>(
    sink: &mut Pin<&mut S>,
    frame: Frame,
    write_wait: Duration,
) -> Result<(), DisconnectReason>
where
    S: Sink<Frame>,
    S::Error: Display,
{
    match timeout(write_wait, sink.send(frame)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(DisconnectReason::WriteFailed(e.to_string())),
        Err(_) => Err(DisconnectReason::WriteDeadline),
    }
}
