//! Vote commands.

use clap::{Args, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::Tabled;

use sharedrop_core::result::AppResult;
use sharedrop_entity::collab::{Vote, VoteSummary};

use super::{Participant, ShareArg};
use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

/// Arguments for vote commands
#[derive(Debug, Args)]
pub struct VoteArgs {
    #[command(subcommand)]
    pub command: VoteCommand,
}

/// Vote subcommands
#[derive(Debug, Subcommand)]
pub enum VoteCommand {
    /// Vote on a file, replacing your earlier vote
    Cast {
        #[command(flatten)]
        who: Participant,
        /// File name
        #[arg(long)]
        file: String,
        /// Your choice
        #[arg(value_enum)]
        choice: Choice,
    },
    /// List votes with a yes/no/maybe tally
    List {
        #[command(flatten)]
        share: ShareArg,
        /// Only this file
        #[arg(long)]
        file: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Choice {
    Yes,
    No,
    Maybe,
}

impl Choice {
    fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Maybe => "maybe",
        }
    }
}

#[derive(Debug, Deserialize)]
struct VoteListing {
    votes: Vec<Vote>,
    summary: VoteSummary,
}

/// Vote display row
#[derive(Debug, Serialize, Tabled)]
struct VoteRow {
    file: String,
    user: String,
    choice: String,
}

/// Execute vote commands
pub async fn execute(args: &VoteArgs, api: &ApiClient, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        VoteCommand::Cast { who, file, choice } => {
            let body = json!({
                "share_id": who.share,
                "file_name": file,
                "user_name": who.user,
                "choice": choice.as_str(),
            });
            let vote: Vote = api.post("/api/votes", &body).await?;
            let choice = vote.choice.as_str();
            output::print_success(&format!("Voted {choice} on {}", vote.file_name));
        }
        VoteCommand::List { share, file } => {
            let mut query = vec![("share_id", share.share.as_str())];
            if let Some(file) = file {
                query.push(("file_name", file.as_str()));
            }
            let listing: VoteListing = api.get("/api/votes/get", &query).await?;
            let rows: Vec<VoteRow> = listing
                .votes
                .iter()
                .map(|v| VoteRow {
                    file: v.file_name.clone(),
                    user: v.user_name.clone(),
                    choice: v.choice.as_str().to_string(),
                })
                .collect();
            output::print_list(&rows, format);
            output::print_item(&listing.summary, format);
        }
    }
    Ok(())
}
