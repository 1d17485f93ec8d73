//! Favorite and tag command.

use clap::Args;
use serde_json::json;

use sharedrop_core::result::AppResult;
use sharedrop_entity::collab::PhotoSelection;

use super::Participant;
use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

/// Arguments for the favorite command
#[derive(Debug, Args)]
pub struct FavoriteArgs {
    #[command(flatten)]
    pub who: Participant,
    /// File name
    #[arg(long)]
    pub file: String,
    /// Clear the favorite flag instead of setting it
    #[arg(long)]
    pub off: bool,
    /// Tags to store (replaces existing tags)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

/// Execute the favorite command
pub async fn execute(args: &FavoriteArgs, api: &ApiClient, format: OutputFormat) -> AppResult<()> {
    let body = json!({
        "share_id": args.who.share,
        "file_name": args.file,
        "user_name": args.who.user,
        "is_favorite": !args.off,
        "tags": args.tags,
    });
    let selection: PhotoSelection = api.post("/api/selections", &body).await?;

    match format {
        OutputFormat::Json => output::print_item(&selection, format),
        OutputFormat::Table => {
            let state = if selection.is_favorite { "favorited" } else { "unfavorited" };
            output::print_success(&format!("{} {state}", selection.file_name));
            if !selection.tags.is_empty() {
                output::print_kv("tags", &selection.tags.join(", "));
            }
        }
    }
    Ok(())
}
