//! # sharedrop-service
//!
//! Use-case layer for ShareDrop. Each mutating action validates its input,
//! checks the share, persists through the [`CollabStore`], and only then
//! hands the hub a broadcast event. The hub never sees an event for a
//! change that was not committed.
//!
//! Services follow constructor injection: dependencies arrive as `Arc`s
//! and cloneable handles at construction time.
//!
//! [`CollabStore`]: sharedrop_database::CollabStore

pub mod collab;
pub mod context;
pub mod session;
pub mod share;

pub use collab::{ChatService, SelectionService, VoteListing, VoteService};
pub use context::ServiceContext;
pub use session::{NameClaim, SessionService};
pub use share::{CreateShareRequest, ShareService};
