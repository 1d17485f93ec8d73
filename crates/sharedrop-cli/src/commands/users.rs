//! Active users command.

use serde::Serialize;
use tabled::Tabled;

use sharedrop_core::result::AppResult;
use sharedrop_realtime::ActiveUsers;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

/// User display row
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    name: String,
    viewing: String,
}

/// Execute the users command
pub async fn execute(share_id: &str, api: &ApiClient, format: OutputFormat) -> AppResult<()> {
    let active: ActiveUsers = api
        .get("/api/active-users", &[("shareId", share_id)])
        .await?;

    match format {
        OutputFormat::Json => output::print_item(&active, format),
        OutputFormat::Table => {
            let rows: Vec<UserRow> = active
                .users
                .iter()
                .map(|u| UserRow {
                    name: u.name.clone(),
                    viewing: u.viewing.clone().unwrap_or_else(|| "-".to_string()),
                })
                .collect();
            output::print_list(&rows, format);
            output::print_kv("connected", &active.count.to_string());
        }
    }
    Ok(())
}
