//! File loading and saving via the `image` crate.
//!
//! Available when the `image-io` feature is enabled (on by default).

use crate::image::{PixelImage, PixelSource};
use crate::trace::trace_event;
use crate::util::color::{pack_argb, rgb_channels};
use crate::util::{PixFindError, PixFindResult};
use image::{ImageFormat, Rgb, RgbImage, RgbaImage};
use std::path::{Path, PathBuf};

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (usize, usize) {
        (self.width() as usize, self.height() as usize)
    }

    fn argb_at(&self, x: usize, y: usize) -> u32 {
        let [r, g, b, a] = self.get_pixel(x as u32, y as u32).0;
        pack_argb(a, r, g, b)
    }
}

/// Decodes any supported image file into RGBA.
pub fn decode_rgba<P: AsRef<Path>>(path: P) -> PixFindResult<RgbaImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PixFindError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let img = image::open(path).map_err(|err| PixFindError::ImageIo {
        reason: err.to_string(),
    })?;
    Ok(img.to_rgba8())
}

impl PixelImage {
    /// Loads `base_path/file_name` into this image.
    ///
    /// A name without any `.` gets `.png` appended before resolving.
    pub fn build_from_file(&mut self, file_name: &str) -> PixFindResult<&mut Self> {
        let path = self.resolve(file_name);
        let rgba = decode_rgba(&path)?;
        let shown = path.display().to_string();
        trace_event!("image_decoded", path = shown.as_str());
        Ok(self.build_from_raw(&rgba))
    }

    /// Creates an image rooted at `base_path` and loads `file_name` into it.
    pub fn open(base_path: impl Into<PathBuf>, file_name: &str) -> PixFindResult<Self> {
        let mut img = Self::new(base_path);
        img.build_from_file(file_name)?;
        Ok(img)
    }

    /// Writes the image as an opaque RGB PNG to `base_path/file_name`.
    ///
    /// The alpha channel is dropped. A name without any `.` gets `.png`
    /// appended; the bytes are PNG regardless of the extension.
    pub fn save(&self, file_name: &str) -> PixFindResult<()> {
        if self.is_empty() {
            return Err(PixFindError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let mut out = RgbImage::new(self.width as u32, self.height as u32);
        for (idx, &px) in self.pixels.iter().enumerate() {
            let (r, g, b) = rgb_channels(px);
            out.put_pixel(
                self.x_of(idx) as u32,
                self.y_of(idx) as u32,
                Rgb([r as u8, g as u8, b as u8]),
            );
        }
        let path = self.resolve(file_name);
        out.save_with_format(&path, ImageFormat::Png)
            .map_err(|err| PixFindError::ImageIo {
                reason: err.to_string(),
            })
    }
}
