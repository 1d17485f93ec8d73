//! CLI command definitions and dispatch.

pub mod chat;
pub mod counts;
pub mod favorite;
pub mod users;
pub mod vote;
pub mod watch;

use clap::{Args, Parser, Subcommand};

use sharedrop_core::result::AppResult;

use crate::client::ApiClient;
use crate::output::OutputFormat;

/// ShareDrop: collaborate on a shared photo folder from the terminal
#[derive(Debug, Parser)]
#[command(name = "sharedrop", version, about, long_about = None)]
pub struct Cli {
    /// Server base URL
    #[arg(short, long, default_value = "http://localhost:8080")]
    pub server: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Follow live events for a share
    Watch(watch::WatchArgs),
    /// Chat messages
    Chat(chat::ChatArgs),
    /// Cast or list votes
    Vote(vote::VoteArgs),
    /// Set the favorite flag and tags on a file
    Favorite(favorite::FavoriteArgs),
    /// Favorite counts per file
    Counts(ShareArg),
    /// Who is connected right now
    Users(ShareArg),
}

/// `--share` alone.
#[derive(Debug, Clone, Args)]
pub struct ShareArg {
    /// Share identifier
    #[arg(long)]
    pub share: String,
}

/// `--share` and `--user`, for commands acting as someone.
#[derive(Debug, Clone, Args)]
pub struct Participant {
    /// Share identifier
    #[arg(long)]
    pub share: String,
    /// Your display name in the session
    #[arg(long)]
    pub user: String,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> AppResult<()> {
        let api = ApiClient::new(&self.server)?;
        match &self.command {
            Commands::Watch(args) => watch::execute(args, &api, self.format).await,
            Commands::Chat(args) => chat::execute(args, &api, self.format).await,
            Commands::Vote(args) => vote::execute(args, &api, self.format).await,
            Commands::Favorite(args) => favorite::execute(args, &api, self.format).await,
            Commands::Counts(args) => counts::execute(&args.share, &api, self.format).await,
            Commands::Users(args) => users::execute(&args.share, &api, self.format).await,
        }
    }
}
