//! Chat commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::json;
use tabled::Tabled;

use sharedrop_core::result::AppResult;
use sharedrop_entity::collab::ChatMessage;

use super::{Participant, ShareArg};
use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

/// Arguments for chat commands
#[derive(Debug, Args)]
pub struct ChatArgs {
    #[command(subcommand)]
    pub command: ChatCommand,
}

/// Chat subcommands
#[derive(Debug, Subcommand)]
pub enum ChatCommand {
    /// Post a message
    Send {
        #[command(flatten)]
        who: Participant,
        /// File the message is about
        #[arg(long)]
        photo: Option<String>,
        /// Message text
        message: String,
    },
    /// Show the share's chat history
    List(ShareArg),
    /// Delete one of your messages
    Delete {
        #[command(flatten)]
        who: Participant,
        /// Message ID
        id: String,
    },
}

/// Chat display row
#[derive(Debug, Serialize, Tabled)]
struct ChatRow {
    /// Message ID
    id: String,
    time: String,
    user: String,
    photo: String,
    message: String,
}

impl From<&ChatMessage> for ChatRow {
    fn from(m: &ChatMessage) -> Self {
        Self {
            id: m.id.clone(),
            time: m.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            user: m.user_name.clone(),
            photo: m.photo_ref.clone().unwrap_or_default(),
            message: m.message.clone(),
        }
    }
}

/// Execute chat commands
pub async fn execute(args: &ChatArgs, api: &ApiClient, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ChatCommand::Send {
            who,
            photo,
            message,
        } => {
            let body = json!({
                "share_id": who.share,
                "user_name": who.user,
                "message": message,
                "photo_ref": photo,
            });
            let sent: ChatMessage = api.post("/api/chat/messages", &body).await?;
            output::print_success(&format!("Message sent ({})", sent.id));
        }
        ChatCommand::List(share) => {
            let query = [("share_id", share.share.as_str())];
            let messages: Vec<ChatMessage> = api.get("/api/chat/messages/get", &query).await?;
            let rows: Vec<ChatRow> = messages.iter().map(ChatRow::from).collect();
            output::print_list(&rows, format);
        }
        ChatCommand::Delete { who, id } => {
            let body = json!({
                "share_id": who.share,
                "message_id": id,
                "user_name": who.user,
            });
            let _: serde_json::Value = api.post("/api/chat/messages/delete", &body).await?;
            output::print_success("Message deleted");
        }
    }
    Ok(())
}
