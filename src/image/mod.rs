//! Indexed pixel images.
//!
//! `PixelImage` owns a row-major buffer of packed `0xAARRGGBB` colors plus a
//! [`ColorIndex`] mapping every color to the positions that hold it. Linear
//! positions follow `index = width * y + x` everywhere in the crate.
//!
//! An image with zero width or height is "absent": it is what a fresh
//! [`PixelImage::new`] holds before any build call, and it matches nothing.

use crate::capture::{CaptureProvider, Rect};
use crate::trace::{trace_event, trace_span};
use crate::util::color::{gray_argb, luma};
use crate::util::{PixFindError, PixFindResult};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub mod index;
#[cfg(feature = "image-io")]
pub mod io;
mod text;

pub use index::ColorIndex;

/// Extension appended to file names that carry none.
pub const DEFAULT_EXTENSION: &str = "png";

/// Row-major source of packed ARGB pixels.
pub trait PixelSource {
    /// Returns `(width, height)` in pixels.
    fn dimensions(&self) -> (usize, usize);

    /// Returns the packed `0xAARRGGBB` color at `(x, y)`.
    ///
    /// Callers only ask for coordinates inside `dimensions()`.
    fn argb_at(&self, x: usize, y: usize) -> u32;
}

/// Owned contiguous ARGB buffer, the plain in-memory [`PixelSource`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawPixels {
    data: Vec<u32>,
    width: usize,
    height: usize,
}

impl RawPixels {
    /// Wraps a row-major buffer whose length must equal `width * height`.
    pub fn new(data: Vec<u32>, width: usize, height: usize) -> PixFindResult<Self> {
        if width == 0 || height == 0 {
            return Err(PixFindError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(PixFindError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(PixFindError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies any pixel source into an owned buffer.
    pub fn from_source<S: PixelSource + ?Sized>(source: &S) -> PixFindResult<Self> {
        let (width, height) = source.dimensions();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(source.argb_at(x, y));
            }
        }
        Self::new(data, width, height)
    }

    /// Returns the backing buffer.
    pub fn data(&self) -> &[u32] {
        &self.data
    }
}

impl PixelSource for RawPixels {
    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn argb_at(&self, x: usize, y: usize) -> u32 {
        self.data[self.width * y + x]
    }
}

/// Pixel buffer with a color index and a lazily computed identity.
#[derive(Clone, Debug, Default)]
pub struct PixelImage {
    base_path: PathBuf,
    pixels: Vec<u32>,
    width: usize,
    height: usize,
    index: ColorIndex,
    identity: OnceLock<String>,
}

impl PixelImage {
    /// Creates an absent image whose file operations resolve against `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    /// Builds an image straight from a pixel source with an empty base path.
    pub fn from_source<S: PixelSource + ?Sized>(source: &S) -> Self {
        let mut img = Self::default();
        img.build_from_raw(source);
        img
    }

    /// Copies every pixel of `source` and rebuilds the color index.
    pub fn build_from_raw<S: PixelSource + ?Sized>(&mut self, source: &S) -> &mut Self {
        let (width, height) = source.dimensions();
        let _span = trace_span!("build_image", width = width, height = height).entered();

        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(source.argb_at(x, y));
            }
        }
        self.width = width;
        self.height = height;
        self.index = ColorIndex::build(&pixels);
        self.pixels = pixels;
        self.identity = OnceLock::new();

        trace_event!(
            "image_indexed",
            colors = self.index.len(),
            background = self.index.background()
        );
        self
    }

    /// Captures `rect` through `provider` and builds from the result.
    pub fn build_from_capture<P: CaptureProvider + ?Sized>(
        &mut self,
        provider: &P,
        rect: Rect,
    ) -> PixFindResult<&mut Self> {
        let raw = provider.capture(rect)?;
        Ok(self.build_from_raw(&raw))
    }

    /// Captures `rect` from the live screen and builds from it.
    #[cfg(feature = "capture")]
    pub fn build_from_region(&mut self, rect: Rect) -> PixFindResult<&mut Self> {
        self.build_from_capture(&crate::capture::ScreenCapture, rect)
    }

    /// Returns the directory file names are resolved against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolves `file_name` against the base path, adding the default
    /// extension when the name has none.
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        self.base_path.join(with_default_extension(file_name))
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true when the image has zero width or height.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the row-major pixel buffer.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Returns the color index.
    pub fn color_index(&self) -> &ColorIndex {
        &self.index
    }

    /// Returns the most frequent color.
    pub fn background_color(&self) -> u32 {
        self.index.background()
    }

    /// Column of linear position `index`.
    #[inline]
    pub fn x_of(&self, index: usize) -> usize {
        index % self.width
    }

    /// Row of linear position `index`.
    #[inline]
    pub fn y_of(&self, index: usize) -> usize {
        index / self.width
    }

    /// Color at `(x, y)` without a column check.
    ///
    /// # Panics
    ///
    /// Panics when `width * y + x` is past the end of the buffer. An `x`
    /// beyond the row wraps into the next row; use [`PixelImage::get`] when
    /// the coordinates are not known to be inside the image.
    #[inline]
    pub fn value_at(&self, x: usize, y: usize) -> u32 {
        self.pixels[self.width * y + x]
    }

    /// Color at `(x, y)`, or `None` outside the image.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.width * y + x).copied()
    }

    /// Replaces every pixel with its opaque gray equivalent and rebuilds the
    /// color index.
    ///
    /// The background color chosen at build time is kept as is, even though
    /// it no longer occurs among the gray pixels.
    ///
    /// The cached identity is left untouched; call [`PixelImage::identity`]
    /// only after the last transform if it must describe the gray pixels.
    pub fn to_gray(&mut self) -> &mut Self {
        for px in &mut self.pixels {
            *px = gray_argb(luma(*px));
        }
        self.index = self.index.rebuild_positions(&self.pixels);
        self
    }

    /// Consuming form of [`PixelImage::to_gray`].
    pub fn into_gray(mut self) -> Self {
        self.to_gray();
        self
    }
}

/// Appends `.png` when `file_name` contains no `.` at all.
pub fn with_default_extension(file_name: &str) -> String {
    if file_name.contains('.') {
        file_name.to_owned()
    } else {
        format!("{file_name}.{DEFAULT_EXTENSION}")
    }
}
