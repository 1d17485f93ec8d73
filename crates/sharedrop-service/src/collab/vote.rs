//! Vote service.

use serde::Serialize;

use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::{Vote, VoteChoice, VoteSummary};
use sharedrop_realtime::message::builder::build_vote_cast;

use super::{file_name, user_name};
use crate::context::ServiceContext;

/// Votes plus their tally.
#[derive(Debug, Clone, Serialize)]
pub struct VoteListing {
    pub votes: Vec<Vote>,
    pub summary: VoteSummary,
}

/// Casts and lists votes.
#[derive(Debug, Clone)]
pub struct VoteService {
    ctx: ServiceContext,
}

impl VoteService {
    /// Creates a new vote service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Records the caller's vote on a file, replacing any earlier one, and
    /// broadcasts `vote.cast`.
    pub async fn cast_vote(
        &self,
        share_id: &ShareId,
        file: &str,
        user: &str,
        choice: VoteChoice,
    ) -> AppResult<Vote> {
        let file = file_name(file)?;
        let user = user_name(user)?;
        self.ctx.require_share(share_id).await?;

        let stored = self
            .ctx
            .store
            .save_vote(&Vote::new(share_id.clone(), file, user, choice))
            .await?;
        self.ctx.publish(build_vote_cast(&stored)).await;
        Ok(stored)
    }

    /// Votes of a share, optionally for one file, with a yes/no/maybe tally.
    pub async fn list_votes(
        &self,
        share_id: &ShareId,
        file: Option<&str>,
    ) -> AppResult<VoteListing> {
        self.ctx.require_share(share_id).await?;
        let votes = self.ctx.store.get_votes(share_id, file).await?;
        let summary = VoteSummary::tally(&votes);
        Ok(VoteListing { votes, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support;

    #[tokio::test]
    async fn test_revote_replaces_choice() {
        let (ctx, _engine, share) = test_support::seeded().await;
        let service = VoteService::new(ctx);

        let first = service
            .cast_vote(&share, "a.jpg", "ana", VoteChoice::Yes)
            .await
            .unwrap();
        let second = service
            .cast_vote(&share, "a.jpg", "ana", VoteChoice::No)
            .await
            .unwrap();
        service
            .cast_vote(&share, "a.jpg", "ben", VoteChoice::Yes)
            .await
            .unwrap();
        service
            .cast_vote(&share, "b.jpg", "ana", VoteChoice::Maybe)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let listing = service.list_votes(&share, Some("a.jpg")).await.unwrap();
        assert_eq!(listing.votes.len(), 2);
        let summary = &listing.summary;
        assert_eq!((summary.yes, summary.no, summary.maybe), (1, 1, 0));
        let all = service.list_votes(&share, None).await.unwrap();
        assert_eq!(all.votes.len(), 3);
    }
}
