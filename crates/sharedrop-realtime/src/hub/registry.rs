//! Share → connection-set bookkeeping.

use std::collections::HashMap;
use std::sync::Arc;

use sharedrop_core::types::{ConnectionId, ShareId};

use crate::connection::handle::{ConnectionHandle, Delivery};
use crate::presence::{ActiveUser, ActiveUsers};

/// Result of fanning one payload out to a share.
#[derive(Debug, Default)]
pub struct FanOut {
    /// Queues that accepted the payload.
    pub enqueued: usize,
    /// Members removed because their queue was full or closed.
    pub evicted: Vec<ConnectionHandle>,
}

/// Connections grouped by share.
///
/// Plain data with no interior locking; the hub task is its only owner.
/// A share entry exists only while it has at least one member.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    shares: HashMap<ShareId, HashMap<ConnectionId, ConnectionHandle>>,
    index: HashMap<ConnectionId, ShareId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection. Hands the handle back if its id is already
    /// registered.
    pub fn insert(&mut self, conn: ConnectionHandle) -> Result<(), ConnectionHandle> {
        if self.index.contains_key(&conn.id) {
            return Err(conn);
        }
        self.index.insert(conn.id, conn.share_id.clone());
        self.shares
            .entry(conn.share_id.clone())
            .or_default()
            .insert(conn.id, conn);
        Ok(())
    }

    /// Remove a connection, dropping the share entry when it empties.
    pub fn remove(&mut self, id: ConnectionId) -> Option<ConnectionHandle> {
        let share_id = self.index.remove(&id)?;
        let members = self.shares.get_mut(&share_id)?;
        let conn = members.remove(&id);
        if members.is_empty() {
            self.shares.remove(&share_id);
        }
        conn
    }

    /// Record what a connection is looking at.
    pub fn set_viewing(&mut self, id: ConnectionId, viewing: Option<String>) -> bool {
        let Some(share_id) = self.index.get(&id) else {
            return false;
        };
        match self.shares.get_mut(share_id).and_then(|m| m.get_mut(&id)) {
            Some(conn) => {
                conn.viewing = viewing;
                true
            }
            None => false,
        }
    }

    /// Offer a payload to every member of a share except `skip`.
    ///
    /// Members whose queue is full or closed are removed on the spot and
    /// handed back to the caller; dropping them closes their queues.
    pub fn fan_out(
        &mut self,
        share_id: &ShareId,
        payload: &Arc<str>,
        skip: Option<ConnectionId>,
    ) -> FanOut {
        let mut result = FanOut::default();
        let Some(members) = self.shares.get_mut(share_id) else {
            return result;
        };

        let mut dead = Vec::new();
        for (id, conn) in members.iter() {
            if Some(*id) == skip {
                continue;
            }
            match conn.try_deliver(payload) {
                Delivery::Enqueued => result.enqueued += 1,
                Delivery::Full | Delivery::Closed => dead.push(*id),
            }
        }

        for id in dead {
            if let Some(conn) = self.remove(id) {
                result.evicted.push(conn);
            }
        }
        result
    }

    /// Live users of a share, oldest connection first.
    pub fn active_users(&self, share_id: &ShareId) -> ActiveUsers {
        let Some(members) = self.shares.get(share_id) else {
            return ActiveUsers::default();
        };
        let mut conns: Vec<&ConnectionHandle> = members.values().collect();
        conns.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        ActiveUsers::new(
            conns
                .into_iter()
                .map(|c| ActiveUser {
                    name: c.user.clone(),
                    viewing: c.viewing.clone(),
                })
                .collect(),
        )
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of shares with at least one connection.
    pub fn share_count(&self) -> usize {
        self.shares.len()
    }

    pub fn connection_count(&self) -> usize {
        self.index.len()
    }

    /// Drop every connection, closing all queues.
    pub fn clear(&mut self) -> usize {
        let n = self.index.len();
        self.index.clear();
        self.shares.clear();
        n
    }
}
