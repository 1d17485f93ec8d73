//! Vote record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sharedrop_core::error::AppError;
use sharedrop_core::types::ShareId;

use super::RecordKey;

/// A ballot choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    /// Keep.
    Yes,
    /// Drop.
    No,
    /// Undecided.
    Maybe,
}

impl VoteChoice {
    /// Stable string form, as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Maybe => "maybe",
        }
    }
}

impl std::str::FromStr for VoteChoice {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            "maybe" => Ok(Self::Maybe),
            other => Err(AppError::validation(format!(
                "invalid vote choice '{other}', expected yes, no, or maybe"
            ))),
        }
    }
}

/// One user's vote on one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Record identifier.
    pub id: String,
    /// Owning share.
    pub share_id: ShareId,
    /// Target file name.
    pub file_name: String,
    /// Voter.
    pub user_name: String,
    /// Ballot.
    pub choice: VoteChoice,
    /// Time of the last update.
    pub timestamp: DateTime<Utc>,
}

impl Vote {
    /// Create a vote stamped with the current time.
    pub fn new(
        share_id: ShareId,
        file_name: impl Into<String>,
        user_name: impl Into<String>,
        choice: VoteChoice,
    ) -> Self {
        Self {
            id: crate::new_record_id(),
            share_id,
            file_name: file_name.into(),
            user_name: user_name.into(),
            choice,
            timestamp: Utc::now(),
        }
    }

    /// Uniqueness key of this record.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.share_id, &self.file_name, &self.user_name)
    }
}

/// Tally of votes by choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSummary {
    /// Number of `yes` votes.
    pub yes: u32,
    /// Number of `no` votes.
    pub no: u32,
    /// Number of `maybe` votes.
    pub maybe: u32,
}

impl VoteSummary {
    /// Count the given votes.
    pub fn tally<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> Self {
        votes.into_iter().fold(Self::default(), |mut acc, vote| {
            match vote.choice {
                VoteChoice::Yes => acc.yes += 1,
                VoteChoice::No => acc.no += 1,
                VoteChoice::Maybe => acc.maybe += 1,
            }
            acc
        })
    }
}
