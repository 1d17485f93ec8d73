//! [`CollabStore`] kept in process memory.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::{ChatMessage, PhotoSelection, RecordKey, Vote};
use sharedrop_entity::share::{Share, ShareSession};

use crate::store::CollabStore;

/// Concurrent maps keyed by share; selections and votes keyed by
/// (share, file, user) so a second save replaces the first.
#[derive(Debug, Default)]
pub struct MemoryStore {
    shares: DashMap<ShareId, Share>,
    sessions: DashMap<ShareId, ShareSession>,
    chat: DashMap<ShareId, Vec<ChatMessage>>,
    selections: DashMap<ShareId, BTreeMap<RecordKey, PhotoSelection>>,
    votes: DashMap<ShareId, BTreeMap<RecordKey, Vote>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollabStore for MemoryStore {
    async fn create_share(&self, share: &Share, session: &ShareSession) -> AppResult<()> {
        let id = &share.id;
        if self.shares.contains_key(id) {
            return Err(AppError::conflict(format!("Share '{id}' already exists")));
        }
        self.shares.insert(share.id.clone(), share.clone());
        self.sessions.insert(share.id.clone(), session.clone());
        Ok(())
    }

    async fn get_share(&self, share_id: &ShareId) -> AppResult<Option<Share>> {
        Ok(self.shares.get(share_id).map(|s| s.clone()))
    }

    async fn record_share_access(&self, share_id: &ShareId) -> AppResult<()> {
        if let Some(mut share) = self.shares.get_mut(share_id) {
            share.access_count += 1;
        }
        Ok(())
    }

    async fn get_session(&self, share_id: &ShareId) -> AppResult<Option<ShareSession>> {
        Ok(self.sessions.get(share_id).map(|s| s.clone()))
    }

    async fn claim_name(&self, share_id: &ShareId, user_name: &str) -> AppResult<bool> {
        match self.sessions.get_mut(share_id) {
            Some(mut session) => Ok(session.claim(user_name)),
            None => Err(AppError::not_found(format!(
                "Session for share '{share_id}' not found"
            ))),
        }
    }

    async fn save_chat_message(&self, message: &ChatMessage) -> AppResult<()> {
        self.chat
            .entry(message.share_id.clone())
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn get_chat_messages(&self, share_id: &ShareId) -> AppResult<Vec<ChatMessage>> {
        Ok(self
            .chat
            .get(share_id)
            .map(|m| m.clone())
            .unwrap_or_default())
    }

    async fn find_chat_message(
        &self,
        share_id: &ShareId,
        message_id: &str,
    ) -> AppResult<Option<ChatMessage>> {
        Ok(self
            .chat
            .get(share_id)
            .and_then(|m| m.iter().find(|msg| msg.id == message_id).cloned()))
    }

    async fn delete_chat_message(&self, share_id: &ShareId, message_id: &str) -> AppResult<bool> {
        let Some(mut messages) = self.chat.get_mut(share_id) else {
            return Ok(false);
        };
        let before = messages.len();
        messages.retain(|m| m.id != message_id);
        Ok(messages.len() != before)
    }

    async fn save_selection(&self, selection: &PhotoSelection) -> AppResult<PhotoSelection> {
        let mut by_key = self
            .selections
            .entry(selection.share_id.clone())
            .or_default();
        let stored = by_key
            .entry(selection.key())
            .and_modify(|existing| {
                existing.is_favorite = selection.is_favorite;
                existing.tags = selection.tags.clone();
                existing.timestamp = selection.timestamp;
            })
            .or_insert_with(|| selection.clone());
        Ok(stored.clone())
    }

    async fn get_selections(&self, share_id: &ShareId) -> AppResult<Vec<PhotoSelection>> {
        Ok(self
            .selections
            .get(share_id)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn save_vote(&self, vote: &Vote) -> AppResult<Vote> {
        let mut by_key = self.votes.entry(vote.share_id.clone()).or_default();
        let stored = by_key
            .entry(vote.key())
            .and_modify(|existing| {
                existing.choice = vote.choice;
                existing.timestamp = vote.timestamp;
            })
            .or_insert_with(|| vote.clone());
        Ok(stored.clone())
    }

    async fn get_votes(&self, share_id: &ShareId, file_name: Option<&str>) -> AppResult<Vec<Vote>> {
        let Some(by_key) = self.votes.get(share_id) else {
            return Ok(Vec::new());
        };
        let mut votes: Vec<Vote> = by_key
            .values()
            .filter(|v| file_name.is_none_or(|f| v.file_name == f))
            .cloned()
            .collect();
        votes.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(votes)
    }
}

#[cfg(test)]
mod tests {
    use sharedrop_entity::collab::VoteChoice;

    use super::*;

    #[tokio::test]
    async fn test_selection_replaces_same_key() {
        let store = MemoryStore::new();
        let id = ShareId::parse("abc123").unwrap();
        let select = |user: &str, favorite| {
            PhotoSelection::new(id.clone(), "a.jpg", user, favorite, vec![])
        };
        let first = store.save_selection(&select("ana", true)).await.unwrap();
        let second = store.save_selection(&select("ana", false)).await.unwrap();
        store.save_selection(&select("ben", true)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.get_selections(&id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_vote_filter_by_file() {
        let store = MemoryStore::new();
        let id = ShareId::parse("abc123").unwrap();
        for (file, choice) in [("a.jpg", VoteChoice::Yes), ("b.jpg", VoteChoice::No)] {
            let vote = Vote::new(id.clone(), file, "ana", choice);
            store.save_vote(&vote).await.unwrap();
        }

        let votes = store.get_votes(&id, Some("b.jpg")).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].choice, VoteChoice::No);
    }

    #[tokio::test]
    async fn test_claim_requires_session() {
        let store = MemoryStore::new();
        let share = Share::new("/p", "pw", None).unwrap();
        let missing = store.claim_name(&share.id, "ana").await;
        assert!(missing.is_err());

        let session = ShareSession::new(share.id.clone(), "s", true);
        store.create_share(&share, &session).await.unwrap();
        assert!(store.claim_name(&share.id, "ana").await.unwrap());
        assert!(!store.claim_name(&share.id, "ana").await.unwrap());
    }
}
