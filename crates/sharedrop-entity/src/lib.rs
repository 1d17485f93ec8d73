//! # sharedrop-entity
//!
//! Domain records for ShareDrop: shares and their collaborative sessions,
//! plus the per-file collaboration records (chat, selections, votes).

pub mod collab;
pub mod share;

/// Generate a fresh record identifier.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
