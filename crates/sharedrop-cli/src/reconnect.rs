//! Reconnect state machine for the live event connection.
//!
//! `Connecting → Connected → Backoff(n) → Connecting → … → GaveUp`. The
//! attempt counter resets on every successful connect, and the
//! "real-time updates enabled" notice is only reported once per process.

use std::time::Duration;

/// Backoff parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconnectPolicy {
    /// Reconnect attempts before giving up.
    pub max_attempts: u32,
    /// Delay before the first reconnect.
    pub base_delay: Duration,
    /// Upper bound on the exponential delay.
    pub max_delay: Duration,
    /// Maximum extra delay as a fraction of the capped delay.
    pub jitter: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            jitter: 0.2,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based).
    ///
    /// `sample` is a jitter draw in `[0, 1)`.
    pub fn delay(&self, attempt: u32, sample: f64) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let raw = self.base_delay.saturating_mul(1u32 << exponent);
        let capped = raw.min(self.max_delay);
        capped.mul_f64(1.0 + self.jitter * sample.clamp(0.0, 1.0))
    }
}

/// Where the client is in its connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    /// Waiting before reconnect attempt `n`.
    Backoff(u32),
    GaveUp,
}

/// Drives [`ConnectionState`] transitions.
#[derive(Debug)]
pub struct Reconnector {
    policy: ReconnectPolicy,
    state: ConnectionState,
    attempts: u32,
    announced: bool,
}

impl Reconnector {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            state: ConnectionState::Connecting,
            attempts: 0,
            announced: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    /// Record a successful connect. Returns `true` only the first time, so
    /// the caller announces real-time updates once.
    pub fn on_connected(&mut self) -> bool {
        self.state = ConnectionState::Connected;
        self.attempts = 0;
        !std::mem::replace(&mut self.announced, true)
    }

    /// Record a lost connection or a failed connect attempt.
    pub fn on_disconnected(&mut self) -> ConnectionState {
        if self.state == ConnectionState::GaveUp {
            return self.state;
        }
        self.state = if self.attempts < self.policy.max_attempts {
            self.attempts += 1;
            ConnectionState::Backoff(self.attempts)
        } else {
            ConnectionState::GaveUp
        };
        self.state
    }

    /// Leave backoff and start the next attempt.
    pub fn begin_attempt(&mut self) {
        if let ConnectionState::Backoff(_) = self.state {
            self.state = ConnectionState::Connecting;
        }
    }

    /// How long to wait in the current backoff state, with a fresh jitter
    /// draw. `None` outside backoff.
    pub fn current_delay(&self) -> Option<Duration> {
        match self.state {
            ConnectionState::Backoff(n) => Some(self.policy.delay(n, rand::random::<f64>())),
            _ => None,
        }
    }

    /// Whether live events are flowing. Polling covers every other state.
    pub fn is_live(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}
