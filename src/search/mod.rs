//! Template search over indexed images.
//!
//! Candidates come from the source's color index: only positions holding the
//! template's top-left color are ever verified. Candidates are tried in
//! row-major order and the first one that stays under the miss threshold is
//! returned; there is no best-match ranking.

mod verify;

use crate::image::PixelImage;
use crate::trace::{trace_event, trace_span};
use crate::util::PixFindResult;
use std::collections::HashMap;
use verify::placement_matches;

/// Default share of mismatched template pixels, in percent, that rejects a
/// placement.
pub const DEFAULT_MAX_MISS_PERCENT: usize = 20;

/// Search configuration.
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Truncated miss percentage at which a placement is rejected.
    ///
    /// A placement survives while `misses * 100 / total < max_miss_percent`.
    /// Zero rejects every placement.
    pub max_miss_percent: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_miss_percent: DEFAULT_MAX_MISS_PERCENT,
        }
    }
}

/// Top-left placement of a template inside a source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// Linear source index, `source.width() * y + x`.
    pub index: usize,
    /// Column in the source.
    pub x: usize,
    /// Row in the source.
    pub y: usize,
}

/// A match produced by [`Matcher::find_by_name`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantMatch {
    /// Name of the variant that matched (`icon`, `icon1`, ...).
    pub name: String,
    /// Where it matched.
    pub position: Position,
}

/// Loads named templates for [`Matcher::find_by_name`].
pub trait TemplateSource {
    /// Loads the template called `name`.
    ///
    /// A template that does not exist must come back as an empty image
    /// (zero width or height) rather than an error; errors are reserved for
    /// templates that exist but cannot be read.
    fn load(&self, name: &str) -> PixFindResult<PixelImage>;
}

impl TemplateSource for HashMap<String, PixelImage> {
    fn load(&self, name: &str) -> PixFindResult<PixelImage> {
        Ok(self.get(name).cloned().unwrap_or_default())
    }
}

/// Templates stored as image files under a base directory.
#[cfg(feature = "image-io")]
#[derive(Clone, Debug)]
pub struct FileTemplates {
    base_path: std::path::PathBuf,
}

#[cfg(feature = "image-io")]
impl FileTemplates {
    pub fn new(base_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[cfg(feature = "image-io")]
impl TemplateSource for FileTemplates {
    fn load(&self, name: &str) -> PixFindResult<PixelImage> {
        let mut img = PixelImage::new(self.base_path.clone());
        match img.build_from_file(name) {
            Ok(_) => Ok(img),
            Err(crate::PixFindError::FileNotFound { .. }) => Ok(img),
            Err(err) => Err(err),
        }
    }
}

/// Exact-color template matcher with a bounded miss tolerance.
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    cfg: MatchConfig,
}

impl Matcher {
    /// Creates a matcher with the default 20% miss threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the search configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Finds the first placement of `target` inside `source`.
    ///
    /// Returns `None` for an empty target, when the target's top-left color
    /// never occurs in the source, or when every candidate reaches the miss
    /// threshold.
    pub fn find(&self, source: &PixelImage, target: &PixelImage) -> Option<Position> {
        if target.is_empty() {
            return None;
        }
        let candidates = source.color_index().positions(target.pixels()[0]);
        let _span = trace_span!("find", candidates = candidates.len()).entered();

        for &index in candidates {
            let x = source.x_of(index);
            let y = source.y_of(index);
            if placement_matches(source, target, x, y, self.cfg.max_miss_percent) {
                trace_event!("match_accepted", index = index, x = x, y = y);
                return Some(Position { index, x, y });
            }
        }
        None
    }

    /// Probes `name`, then `name1`, `name2`, ... until one matches.
    ///
    /// The plain name is always tried. Numbered variants are tried in order
    /// and probing stops at the first variant that loads as an empty image.
    /// `Ok(None)` therefore covers both "no variant matched" and "the next
    /// variant does not exist".
    pub fn find_by_name<T: TemplateSource + ?Sized>(
        &self,
        source: &PixelImage,
        templates: &T,
        name: &str,
    ) -> PixFindResult<Option<VariantMatch>> {
        let _span = trace_span!("find_by_name", template = name).entered();

        let template = templates.load(name)?;
        if let Some(position) = self.find(source, &template) {
            return Ok(Some(VariantMatch {
                name: name.to_owned(),
                position,
            }));
        }

        for suffix in 1usize.. {
            let variant = format!("{name}{suffix}");
            let template = templates.load(&variant)?;
            trace_event!(
                "variant_probed",
                variant = variant.as_str(),
                empty = template.is_empty()
            );
            if template.is_empty() {
                break;
            }
            if let Some(position) = self.find(source, &template) {
                return Ok(Some(VariantMatch {
                    name: variant,
                    position,
                }));
            }
        }
        Ok(None)
    }
}
