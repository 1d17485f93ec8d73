//! Wire event model, construction helpers, codec and validation.

pub mod builder;
pub mod codec;
pub mod types;
pub mod validator;
