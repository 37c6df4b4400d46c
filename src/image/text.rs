//! Canonical text form and content identity.
//!
//! The text form is `{"width": W, "height": H, "bgc": BG, "image": [[..],..]}`
//! with colors printed as signed 32-bit decimals, i.e. the packed ARGB value
//! reinterpreted as `i32`. Opaque colors therefore print as negative numbers.

use crate::image::PixelImage;
use md5::{Digest, Md5};
use std::fmt;

impl fmt::Display for PixelImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"width\": {}, \"height\": {}, \"bgc\": {}, \"image\": [",
            self.width,
            self.height,
            self.background_color() as i32
        )?;
        for (y, row) in self.pixels.chunks(self.width.max(1)).enumerate() {
            if y > 0 {
                f.write_str(",")?;
            }
            f.write_str("[")?;
            for (x, &px) in row.iter().enumerate() {
                if x > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", px as i32)?;
            }
            f.write_str("]")?;
        }
        f.write_str("]}")
    }
}

impl PixelImage {
    /// Lowercase hex MD5 of the canonical text form.
    ///
    /// Computed on first use and cached. The cache survives
    /// [`PixelImage::to_gray`], so an identity read before the transform
    /// keeps describing the pre-transform pixels.
    pub fn identity(&self) -> &str {
        self.identity.get_or_init(|| {
            let digest = Md5::digest(self.to_string().as_bytes());
            format!("{digest:x}")
        })
    }
}
