//! Color-to-positions index used to prune search candidates.

use std::collections::HashMap;

/// Maps each color value to the row-major list of pixel indices holding it.
///
/// The index is always built wholesale from a pixel buffer; it is never
/// patched incrementally. Position lists are in scan order, so the first
/// entry of every list is the top-most, left-most occurrence of that color.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorIndex {
    positions: HashMap<u32, Vec<usize>>,
    background: u32,
}

impl ColorIndex {
    /// Builds the index over `pixels` and picks the background color.
    ///
    /// A color becomes the background the first time its count strictly
    /// exceeds the running maximum, so on ties the color that reached the
    /// shared count first wins.
    pub fn build(pixels: &[u32]) -> Self {
        let mut positions: HashMap<u32, Vec<usize>> = HashMap::new();
        let mut background = 0u32;
        let mut max_count = 0usize;
        for (idx, &color) in pixels.iter().enumerate() {
            let list = positions.entry(color).or_default();
            list.push(idx);
            if list.len() > max_count {
                max_count = list.len();
                background = color;
            }
        }
        Self {
            positions,
            background,
        }
    }

    /// Re-indexes `pixels` but keeps this index's background color.
    ///
    /// The background is fixed when an image is first built; pixel
    /// transforms only refresh the position lists.
    pub fn rebuild_positions(&self, pixels: &[u32]) -> Self {
        Self {
            background: self.background,
            ..Self::build(pixels)
        }
    }

    /// Returns the positions holding `color`, empty when the color is absent.
    pub fn positions(&self, color: u32) -> &[usize] {
        self.positions.get(&color).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns how many pixels hold `color`.
    pub fn count(&self, color: u32) -> usize {
        self.positions(color).len()
    }

    /// Returns the most frequent color (zero for an empty index).
    pub fn background(&self) -> u32 {
        self.background
    }

    /// Returns the number of distinct colors.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true when no pixels were indexed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterates over the distinct colors in arbitrary order.
    pub fn colors(&self) -> impl Iterator<Item = u32> + '_ {
        self.positions.keys().copied()
    }
}
