//! Display-name claims and presence queries.

pub mod service;

pub use service::{NameClaim, SessionService};
