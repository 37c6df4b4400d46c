//! pixfind locates a small template image inside a larger image by exact
//! color comparison, tolerating a bounded share of mismatched pixels.
//!
//! Images are indexed by color when they are built, so a search only visits
//! source positions that share the template's top-left color. Sources come
//! from raw buffers, image files (`image-io` feature, on by default) or the
//! live screen (`capture` feature).

pub mod capture;
pub mod image;
pub mod search;
mod trace;
pub mod util;

pub use crate::capture::{CaptureProvider, Rect};
#[cfg(feature = "capture")]
pub use crate::capture::ScreenCapture;
pub use crate::image::{ColorIndex, PixelImage, PixelSource, RawPixels};
#[cfg(feature = "image-io")]
pub use crate::search::FileTemplates;
pub use crate::search::{MatchConfig, Matcher, Position, TemplateSource, VariantMatch};
pub use crate::util::{PixFindError, PixFindResult};
