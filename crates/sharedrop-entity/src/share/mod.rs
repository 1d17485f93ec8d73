//! Share and share-session entities.

pub mod model;
pub mod session;

pub use model::Share;
pub use session::ShareSession;
