//! Shared utility helpers.

pub(crate) mod color;
pub mod error;

pub use error::{PixFindError, PixFindResult};
