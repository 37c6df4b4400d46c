//! Per-placement verification scan.

use crate::image::PixelImage;

/// Checks whether `target` placed with its top-left pixel at `(x, y)` in
/// `source` stays under the miss threshold.
///
/// Target pixels are compared in row-major order. After every comparison
/// the truncated miss percentage `misses * 100 / total` is tested against
/// `max_miss_percent`, and the placement is rejected as soon as it reaches
/// it. Target pixels that land outside `source` count as misses.
pub(crate) fn placement_matches(
    source: &PixelImage,
    target: &PixelImage,
    x: usize,
    y: usize,
    max_miss_percent: usize,
) -> bool {
    let total = target.width() * target.height();
    let mut misses = 0usize;
    for (ti, &expected) in target.pixels().iter().enumerate() {
        let tx = target.x_of(ti);
        let ty = target.y_of(ti);
        if source.get(x + tx, y + ty) != Some(expected) {
            misses += 1;
        }
        if misses * 100 / total >= max_miss_percent {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::placement_matches;
    use crate::image::{PixelImage, RawPixels};

    fn image(data: Vec<u32>, width: usize, height: usize) -> PixelImage {
        PixelImage::from_source(&RawPixels::new(data, width, height).unwrap())
    }

    #[test]
    fn exact_placement_is_accepted() {
        let source = image(vec![1, 2, 3, 4, 5, 6], 3, 2);
        let target = image(vec![2, 3, 5, 6], 2, 2);
        assert!(placement_matches(&source, &target, 1, 0, 20));
        assert!(!placement_matches(&source, &target, 0, 0, 20));
    }

    #[test]
    fn overhanging_pixels_count_as_misses() {
        // Only the left column fits. A linear read of (2, 0) would wrap to
        // the 3 at the start of the next row and count as a hit.
        let source = image(vec![1, 2, 3, 4], 2, 2);
        let target = image(vec![2, 3, 4, 1], 2, 2);
        assert!(!placement_matches(&source, &target, 1, 0, 50));
        assert!(placement_matches(&source, &target, 1, 0, 51));
    }
}
