//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level counters, shared between the hub and connection adapters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    /// Total connections ever registered
    pub connections_total: AtomicU64,
    /// Connections currently registered
    pub connections_active: AtomicU64,
    /// Events decoded from clients
    pub events_received: AtomicU64,
    /// Events fanned out by the hub
    pub events_broadcast: AtomicU64,
    /// Individual queue enqueues across all fan-outs
    pub events_enqueued: AtomicU64,
    /// Connections evicted for not draining their queue
    pub evictions: AtomicU64,
    /// Inbound frames discarded as malformed
    pub malformed_frames: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a registration
    pub fn record_connect(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a removal from the registry
    pub fn record_disconnect(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record several removals at once
    pub fn record_disconnects(&self, n: usize) {
        self.connections_active
            .fetch_sub(n as u64, Ordering::Relaxed);
    }

    /// Record one fan-out and how many queues accepted it
    pub fn record_broadcast(&self, enqueued: usize) {
        self.events_broadcast.fetch_add(1, Ordering::Relaxed);
        self.events_enqueued
            .fetch_add(enqueued as u64, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.malformed_frames.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            events_received: self.events_received.load(Ordering::Relaxed),
            events_broadcast: self.events_broadcast.load(Ordering::Relaxed),
            events_enqueued: self.events_enqueued.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            malformed_frames: self.malformed_frames.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub connections_total: u64,
    pub connections_active: u64,
    pub events_received: u64,
    pub events_broadcast: u64,
    pub events_enqueued: u64,
    pub evictions: u64,
    pub malformed_frames: u64,
}
