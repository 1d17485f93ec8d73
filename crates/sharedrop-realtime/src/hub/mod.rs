//! The broadcast coordinator.
//!
//! A single task owns the [`registry::SessionRegistry`]; everything else
//! talks to it through a cloneable [`handle::HubHandle`]. Commands are
//! processed one at a time to completion, which gives a total order over
//! registration, deregistration, broadcast and presence queries.

pub mod actor;
pub mod command;
pub mod handle;
pub mod registry;

pub use actor::Hub;
pub use handle::HubHandle;
pub use registry::SessionRegistry;
