//! Error types for pixfind.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for pixfind operations.
pub type PixFindResult<T> = std::result::Result<T, PixFindError>;

/// Errors that can occur while building images or searching templates.
///
/// A template that is simply not present in the source is not an error;
/// search operations report that as `None`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PixFindError {
    /// The resolved image path does not exist.
    #[error("image file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    /// Decoding or encoding an image file failed.
    #[error("image I/O failed: {reason}")]
    ImageIo { reason: String },
    /// Screen capture is unavailable or failed.
    #[error("screen capture failed: {reason}")]
    Capture { reason: String },
    /// Width or height is zero where a non-empty image is required.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The raw buffer length does not match `width * height`.
    #[error("pixel buffer has {got} elements, expected {needed}")]
    BufferTooSmall { needed: usize, got: usize },
}
