//! HTTP request handlers.

pub mod chat;
pub mod health;
pub mod presence;
pub mod selection;
pub mod session;
pub mod share;
pub mod vote;
pub mod ws;

use sharedrop_core::error::AppError;
use sharedrop_core::types::ShareId;

use crate::error::ApiError;

/// Parse a share id taken from a query string, which may be absent.
pub(crate) fn share_id_param(raw: Option<&str>) -> Result<ShareId, ApiError> {
    let raw = raw.ok_or_else(|| AppError::validation("share_id is required"))?;
    Ok(ShareId::parse(raw)?)
}
