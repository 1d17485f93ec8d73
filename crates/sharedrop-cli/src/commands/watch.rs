//! Live event watcher.
//!
//! Holds a WebSocket to the server and prints every event it receives.
//! Whenever the socket is down (backing off, or after giving up) the
//! favorite counts are polled over HTTP instead.

use std::future::Future;
use std::time::Duration;

use clap::Args;
use futures::StreamExt;
use serde_json::json;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, warn};

use sharedrop_core::error::{AppError, ErrorKind};
use sharedrop_core::result::AppResult;
use sharedrop_realtime::message::codec::decode_batch;

use super::{Participant, counts};
use crate::client::ApiClient;
use crate::output::{self, OutputFormat};
use crate::reconnect::{ConnectionState, ReconnectPolicy, Reconnector};

/// Arguments for the watch command
#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub who: Participant,
    /// Keep going when the name is already claimed, e.g. your own claim
    /// from an earlier run
    #[arg(long)]
    pub reuse_name: bool,
    /// Seconds between favorite-count polls while offline
    #[arg(long, default_value_t = 5)]
    pub poll_interval: u64,
}

/// Execute the watch command
pub async fn execute(args: &WatchArgs, api: &ApiClient, format: OutputFormat) -> AppResult<()> {
    claim_name(api, &args.who, args.reuse_name).await?;

    let url = api.ws_url(&args.who.share, &args.who.user)?;
    let mut reconnector = Reconnector::new(ReconnectPolicy::default());
    let mut poll = tokio::time::interval(Duration::from_secs(args.poll_interval.max(1)));
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        match reconnector.state() {
            ConnectionState::Connecting => {
                debug!(url = %url, "Connecting");
                let connected = tokio::select! {
                    res = tokio_tungstenite::connect_async(url.as_str()) => res,
                    _ = &mut shutdown => return Ok(()),
                };
                match connected {
                    Ok((socket, _)) => {
                        if reconnector.on_connected() {
                            output::print_success("Real-time updates enabled");
                        }
                        let ended = tokio::select! {
                            res = stream_events(socket, format) => res,
                            _ = &mut shutdown => return Ok(()),
                        };
                        match ended {
                            Ok(()) => debug!("Server closed the connection"),
                            Err(e) => warn!(error = %e, "Connection lost"),
                        }
                    }
                    Err(e) => warn!(error = %e, "Connect failed"),
                }
                reconnector.on_disconnected();
            }
            ConnectionState::Backoff(attempt) => {
                let delay = reconnector
                    .current_delay()
                    .unwrap_or(reconnector.policy().base_delay);
                output::print_warning(&format!(
                    "Live updates unavailable, retrying in {:.1}s (attempt {attempt}/{})",
                    delay.as_secs_f64(),
                    reconnector.policy().max_attempts
                ));
                let sleep = tokio::time::sleep(delay);
                let retried = tokio::select! {
                    _ = poll_until(api, &args.who.share, format, &mut poll, sleep) => true,
                    _ = &mut shutdown => false,
                };
                if !retried {
                    return Ok(());
                }
                reconnector.begin_attempt();
            }
            ConnectionState::GaveUp => {
                output::print_warning("Giving up on live updates; polling for changes instead");
                let forever = std::future::pending::<()>();
                tokio::select! {
                    _ = poll_until(api, &args.who.share, format, &mut poll, forever) => {}
                    _ = &mut shutdown => {}
                }
                return Ok(());
            }
            ConnectionState::Connected => {
                reconnector.on_disconnected();
            }
        }
    }
}

/// Claim the display name before joining.
async fn claim_name(api: &ApiClient, who: &Participant, reuse: bool) -> AppResult<()> {
    let body = json!({ "share_id": who.share, "user_name": who.user });
    match api
        .post::<_, serde_json::Value>("/api/sessions/validate-name", &body)
        .await
    {
        Ok(_) => Ok(()),
        Err(e) if e.kind == ErrorKind::Conflict && reuse => {
            let user = &who.user;
            output::print_warning(&format!("Joining as '{user}' which is already claimed"));
            Ok(())
        }
        Err(e) if e.kind == ErrorKind::Conflict => Err(AppError::conflict(format!(
            "{e}. Try '{}2' or '{}_B', or pass --reuse-name if the name is yours",
            who.user, who.user
        ))),
        Err(e) => Err(e),
    }
}

/// Print events until the socket closes.
async fn stream_events<S>(mut socket: S, format: OutputFormat) -> Result<(), tungstenite::Error>
where
    S: futures::Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(msg) = socket.next().await {
        match msg? {
            Message::Text(text) => {
                for decoded in decode_batch(text.as_str()) {
                    match decoded {
                        Ok(event) => output::print_event(&event, format),
                        Err(e) => warn!(error = %e, "Skipping malformed event"),
                    }
                }
            }
            Message::Close(frame) => {
                debug!(frame = ?frame, "Close frame received");
                return Ok(());
            }
            _ => {}
        }
    }
    Ok(())
}

/// Poll favorite counts on every tick until `until` completes.
async fn poll_until(
    api: &ApiClient,
    share_id: &str,
    format: OutputFormat,
    poll: &mut Interval,
    until: impl Future<Output = ()>,
) {
    tokio::pin!(until);
    loop {
        tokio::select! {
            _ = &mut until => return,
            _ = poll.tick() => match counts::fetch(api, share_id).await {
                Ok(counts) => counts::print(&counts, format),
                Err(e) => warn!(error = %e, "Polling favorite counts failed"),
            },
        }
    }
}
