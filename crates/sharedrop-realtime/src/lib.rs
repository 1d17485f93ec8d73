//! # sharedrop-realtime
//!
//! Real-time collaboration hub for ShareDrop. Provides:
//!
//! - A single-owner Hub actor that serializes registration, deregistration,
//!   broadcast and active-user queries per process
//! - Bounded per-connection outbound queues with slow-consumer eviction
//! - A transport-agnostic connection adapter (reader and writer tasks,
//!   heartbeat, write deadlines, outbound batching)
//! - The tagged wire event model and its codec
//! - Presence snapshots and favorite-count projections
//! - Engine metrics

pub mod connection;
pub mod hub;
pub mod message;
pub mod metrics;
pub mod presence;
pub mod query;
pub mod server;

pub use connection::frame::Frame;
pub use connection::reason::DisconnectReason;
pub use hub::handle::HubHandle;
pub use message::types::{Event, EventType};
pub use metrics::RealtimeMetrics;
pub use presence::{ActiveUser, ActiveUsers};
pub use server::RealtimeEngine;
