//! Favorite counts command.

use std::collections::BTreeMap;

use serde::Serialize;
use tabled::Tabled;

use sharedrop_core::result::AppResult;
use sharedrop_realtime::query::FavoriteCount;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

/// Counts display row
#[derive(Debug, Serialize, Tabled)]
struct CountRow {
    file: String,
    favorites: usize,
    users: String,
}

/// Fetch per-file favorite counts.
pub async fn fetch(api: &ApiClient, share_id: &str) -> AppResult<BTreeMap<String, FavoriteCount>> {
    api.get("/api/selections/counts", &[("share_id", share_id)])
        .await
}

/// Print counts in the selected format.
pub fn print(counts: &BTreeMap<String, FavoriteCount>, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_item(counts, format),
        OutputFormat::Table => {
            let rows: Vec<CountRow> = counts
                .iter()
                .map(|(file, count)| CountRow {
                    file: file.clone(),
                    favorites: count.favorites,
                    users: count.users.join(", "),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }
}

/// Execute the counts command
pub async fn execute(share_id: &str, api: &ApiClient, format: OutputFormat) -> AppResult<()> {
    let counts = fetch(api, share_id).await?;
    print(&counts, format);
    Ok(())
}
