//! Screen-region acquisition.
//!
//! The matcher never talks to a display directly; images built from the
//! screen go through a [`CaptureProvider`], which lets tests substitute a
//! canned provider. The `capture` feature adds [`ScreenCapture`], backed by
//! `xcap`.

use crate::image::RawPixels;
use crate::util::{PixFindError, PixFindResult};

/// Rectangle in screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Produces the pixels currently shown inside a screen rectangle.
pub trait CaptureProvider {
    /// Captures `rect`; failures are reported as `PixFindError::Capture`.
    fn capture(&self, rect: Rect) -> PixFindResult<RawPixels>;
}

/// Pixel-space crop of a capture: `(left, top, width, height)`.
pub(crate) type CaptureCrop = (u32, u32, u32, u32);

/// Maps `rect`, given in logical screen points, onto a monitor capture.
///
/// `origin` and `logical` are the monitor's position and size in points,
/// `captured` is the size of the captured bitmap. On scaled displays the
/// bitmap is larger than the logical size, so every edge is scaled per axis.
#[cfg_attr(not(feature = "capture"), allow(dead_code))]
pub(crate) fn logical_to_capture(
    rect: Rect,
    origin: (i32, i32),
    logical: (u32, u32),
    captured: (u32, u32),
) -> PixFindResult<CaptureCrop> {
    if rect.width == 0 || rect.height == 0 {
        return Err(PixFindError::InvalidDimensions {
            width: rect.width as usize,
            height: rect.height as usize,
        });
    }
    if logical.0 == 0 || logical.1 == 0 {
        return Err(PixFindError::Capture {
            reason: "monitor reports a zero logical size".to_owned(),
        });
    }
    let scale_x = f64::from(captured.0) / f64::from(logical.0);
    let scale_y = f64::from(captured.1) / f64::from(logical.1);

    let left = (f64::from((rect.x - origin.0).max(0)) * scale_x).round() as u32;
    let top = (f64::from((rect.y - origin.1).max(0)) * scale_y).round() as u32;
    let width = ((f64::from(rect.width) * scale_x).round() as u32).max(1);
    let height = ((f64::from(rect.height) * scale_y).round() as u32).max(1);

    if left.saturating_add(width) > captured.0 || top.saturating_add(height) > captured.1 {
        return Err(PixFindError::Capture {
            reason: format!(
                "region {}x{} at ({}, {}) exceeds the {}x{} monitor",
                rect.width, rect.height, rect.x, rect.y, logical.0, logical.1
            ),
        });
    }
    Ok((left, top, width, height))
}

#[cfg(feature = "capture")]
pub use screen::ScreenCapture;

#[cfg(feature = "capture")]
mod screen {
    use super::{logical_to_capture, CaptureProvider, Rect};
    use crate::image::RawPixels;
    use crate::trace::trace_span;
    use crate::util::{PixFindError, PixFindResult};
    use image::{imageops, RgbaImage};
    use xcap::Monitor;

    /// Live display capture through `xcap`.
    ///
    /// The monitor containing the rectangle's top-left corner is captured in
    /// full and then cropped to the rectangle. The result has the display's
    /// physical resolution, so on a 2x display a 50x50 point rectangle yields
    /// 100x100 pixels.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct ScreenCapture;

    fn capture_err(err: impl std::fmt::Display) -> PixFindError {
        PixFindError::Capture {
            reason: err.to_string(),
        }
    }

    impl CaptureProvider for ScreenCapture {
        fn capture(&self, rect: Rect) -> PixFindResult<RawPixels> {
            let _span = trace_span!("screen_capture", x = rect.x, y = rect.y).entered();

            let monitor = Monitor::from_point(rect.x, rect.y).map_err(capture_err)?;
            let origin = (
                monitor.x().map_err(capture_err)?,
                monitor.y().map_err(capture_err)?,
            );
            let logical = (
                monitor.width().map_err(capture_err)?,
                monitor.height().map_err(capture_err)?,
            );
            let shot = monitor.capture_image().map_err(capture_err)?;
            // Rebuild through raw bytes so xcap's `image` version never leaks
            // into our types.
            let (shot_w, shot_h) = (shot.width(), shot.height());
            let shot = RgbaImage::from_raw(shot_w, shot_h, shot.into_raw())
                .ok_or_else(|| capture_err("capture buffer does not match its dimensions"))?;

            let (left, top, width, height) =
                logical_to_capture(rect, origin, logical, (shot_w, shot_h))?;
            let region = imageops::crop_imm(&shot, left, top, width, height).to_image();
            RawPixels::from_source(&region)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{logical_to_capture, Rect};
    use crate::util::PixFindError;

    #[test]
    fn unscaled_monitor_crops_in_place() {
        let crop =
            logical_to_capture(Rect::new(100, 40, 50, 20), (0, 0), (800, 600), (800, 600)).unwrap();
        assert_eq!(crop, (100, 40, 50, 20));
    }

    #[test]
    fn scaled_monitor_crops_physical_pixels() {
        let crop = logical_to_capture(
            Rect::new(100, 100, 50, 50),
            (0, 0),
            (1440, 900),
            (2880, 1800),
        )
        .unwrap();
        assert_eq!(crop, (200, 200, 100, 100));
    }

    #[test]
    fn secondary_monitor_origin_is_subtracted_before_scaling() {
        let crop = logical_to_capture(
            Rect::new(1940, 10, 30, 30),
            (1920, 0),
            (1280, 720),
            (2560, 1440),
        )
        .unwrap();
        assert_eq!(crop, (40, 20, 60, 60));
    }

    #[test]
    fn region_past_monitor_edge_is_a_capture_error() {
        let err = logical_to_capture(Rect::new(1400, 0, 50, 50), (0, 0), (1440, 900), (2880, 1800))
            .err()
            .unwrap();
        assert!(matches!(err, PixFindError::Capture { .. }));

        let err = logical_to_capture(Rect::new(0, 0, 0, 5), (0, 0), (10, 10), (10, 10))
            .err()
            .unwrap();
        assert_eq!(err, PixFindError::InvalidDimensions { width: 0, height: 5 });
    }
}
