//! Chat, vote and selection actions.

pub mod chat;
pub mod selection;
pub mod vote;

pub use chat::ChatService;
pub use selection::SelectionService;
pub use vote::{VoteListing, VoteService};

use sharedrop_core::result::AppResult;

use crate::context::required;
use crate::session::service::MAX_USER_NAME_LEN;

/// Maximum length of a file reference.
pub(crate) const MAX_FILE_NAME_LEN: usize = 1024;

pub(crate) fn user_name(value: &str) -> AppResult<String> {
    required("user_name", value, MAX_USER_NAME_LEN)
}

pub(crate) fn file_name(value: &str) -> AppResult<String> {
    required("file_name", value, MAX_FILE_NAME_LEN)
}
