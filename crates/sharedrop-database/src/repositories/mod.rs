//! Repository implementations for all persisted records.

pub mod chat;
pub mod selection;
pub mod session;
pub mod share;
pub mod vote;

pub use chat::ChatRepository;
pub use selection::SelectionRepository;
pub use session::SessionRepository;
pub use share::ShareRepository;
pub use vote::VoteRepository;

use sharedrop_core::error::{AppError, ErrorKind};
use sharedrop_core::types::ShareId;

/// Parse a share identifier read back from a row.
pub(crate) fn share_id_column(raw: String) -> Result<ShareId, AppError> {
    ShareId::parse(&raw).map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Stored share id '{raw}' is invalid"),
            e,
        )
    })
}
