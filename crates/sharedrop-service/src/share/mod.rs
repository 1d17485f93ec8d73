//! Share creation and lookup.

pub mod service;

pub use service::{CreateShareRequest, ShareService};
