//! Read-only projections over collaboration records.

pub mod favorites;

pub use favorites::{FavoriteCount, favorite_counts};
