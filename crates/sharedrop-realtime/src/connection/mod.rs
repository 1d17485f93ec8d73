//! Per-connection state and the reader/writer adapter.

pub mod adapter;
pub mod frame;
pub mod handle;
pub mod reason;

pub use adapter::{AdapterSettings, serve};
pub use handle::ConnectionHandle;
