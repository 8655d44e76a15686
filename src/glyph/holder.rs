//! Normalized, queryable glyph sets.
//!
//! A [`CharacterHolder`] renders every character of its configured set,
//! scores each raster with the zone model and rescales the scores to
//! `[0, 255]` so they compare directly with image block scores. Two
//! strategies exist:
//!
//! - **Fixed subset**: caller-ordered characters, expected to run from the
//!   lightest glyph to the darkest (e.g. `" .,:;ox%#@"`). Lookup is a
//!   proportional projection of the score onto the subset index.
//! - **Full range**: all printable ASCII (32..=126), sorted by raw score.
//!   Lookup is a binary search over the rescaled scores.

use std::ops::RangeInclusive;

use super::intensity;
use super::render::{GlyphRenderer, RenderParams};
use crate::error::{MosaicError, RasterError, RenderError, Result};
use crate::raster::RasterBuffer;

/// Character codes of the full-range holder.
pub const PRINTABLE_ASCII: RangeInclusive<u8> = 32..=126;

/// A rendered character with its ink density.
#[derive(Debug, Clone)]
pub struct Glyph {
    character: char,
    raster: RasterBuffer,
    raw_score: u32,
    score: u32,
}

impl Glyph {
    /// Score a rendered raster. The normalized score starts equal to the raw one.
    pub fn new(character: char, raster: RasterBuffer) -> std::result::Result<Self, RasterError> {
        let raw_score = intensity::score(&raster)?;
        Ok(Self {
            character,
            raster,
            raw_score,
            score: raw_score,
        })
    }

    pub fn character(&self) -> char {
        self.character
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    /// Score straight from the intensity model.
    pub fn raw_score(&self) -> u32 {
        self.raw_score
    }

    /// Score rescaled to `[0, 255]` across the holder.
    pub fn score(&self) -> u32 {
        self.score
    }

    fn rescale(&mut self, min: u32, max: u32) {
        let numerator = (self.raw_score as i64 - min as i64) * 255;
        let denominator = max as i64 - min as i64;
        self.score = (numerator / denominator).clamp(0, 255) as u32;
    }
}

/// Which character set a holder was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HolderKind {
    FixedSubset(String),
    FullRange,
}

/// A normalized glyph set for one (rendering parameters, subset) pair.
#[derive(Debug, Clone)]
pub struct CharacterHolder {
    params: RenderParams,
    kind: HolderKind,
    glyphs: Vec<Glyph>,
    min_intensity: u32,
    max_intensity: u32,
}

impl CharacterHolder {
    /// Build the holder matching `subset`: fixed when given, full range otherwise.
    pub fn build(
        params: &RenderParams,
        subset: Option<&str>,
        renderer: &dyn GlyphRenderer,
    ) -> Result<Self> {
        match subset {
            Some(subset) => Self::fixed_subset(params, subset, renderer),
            None => Self::full_range(params, renderer),
        }
    }

    /// Build a holder from `subset`, keeping the caller's character order.
    pub fn fixed_subset(
        params: &RenderParams,
        subset: &str,
        renderer: &dyn GlyphRenderer,
    ) -> Result<Self> {
        params.validate()?;
        if subset.is_empty() {
            return Err(MosaicError::InvalidRequest(
                "character subset is empty".to_string(),
            ));
        }

        let glyphs = subset
            .chars()
            .map(|ch| create_glyph(ch, params, renderer))
            .collect::<Result<Vec<_>>>()?;

        let mut holder = Self {
            params: params.clone(),
            kind: HolderKind::FixedSubset(subset.to_string()),
            glyphs,
            min_intensity: 0,
            max_intensity: 0,
        };
        holder.normalize()?;
        log::debug!(
            "Built fixed-subset holder {:?} for {} (raw {}..={})",
            subset,
            params,
            holder.min_intensity,
            holder.max_intensity
        );
        Ok(holder)
    }

    /// Build a holder from every printable ASCII character, darkest first.
    pub fn full_range(params: &RenderParams, renderer: &dyn GlyphRenderer) -> Result<Self> {
        params.validate()?;

        let mut glyphs = PRINTABLE_ASCII
            .map(|code| create_glyph(code as char, params, renderer))
            .collect::<Result<Vec<_>>>()?;
        glyphs.sort_by_key(Glyph::raw_score);

        let mut holder = Self {
            params: params.clone(),
            kind: HolderKind::FullRange,
            glyphs,
            min_intensity: 0,
            max_intensity: 0,
        };
        holder.normalize()?;
        log::debug!(
            "Built full-range holder for {} (raw {}..={})",
            params,
            holder.min_intensity,
            holder.max_intensity
        );
        Ok(holder)
    }

    /// Rescale every glyph score to `[0, 255]`.
    ///
    /// The fixed subset trusts its ordering: the first glyph is taken as the
    /// brightest and the last as the darkest. The full range is sorted, so
    /// its ends are the true extremes.
    fn normalize(&mut self) -> Result<()> {
        let (Some(first), Some(last)) = (self.glyphs.first(), self.glyphs.last()) else {
            return Err(MosaicError::InvalidRequest("holder has no glyphs".to_string()));
        };
        let (first, last) = (first.raw_score, last.raw_score);

        let (min, max) = match self.kind {
            HolderKind::FixedSubset(ref subset) => {
                if first < last {
                    log::warn!(
                        "Subset {:?} starts darker than it ends; expected lightest-to-darkest order",
                        subset
                    );
                }
                (last, first)
            }
            HolderKind::FullRange => (first, last),
        };
        if min == max {
            return Err(MosaicError::DegenerateIntensityRange { intensity: min });
        }

        self.min_intensity = min;
        self.max_intensity = max;
        for glyph in &mut self.glyphs {
            glyph.rescale(min, max);
        }
        Ok(())
    }

    /// The glyph whose normalized score best matches `score`.
    pub fn closest(&self, score: u32) -> &Glyph {
        match self.kind {
            HolderKind::FixedSubset(_) => self.closest_proportional(score),
            HolderKind::FullRange => self.closest_searched(score),
        }
    }

    /// Index `((255 - score) * count) / 256`, clamped into the subset.
    ///
    /// This projects the score onto the subset positions rather than
    /// comparing against glyph scores.
    fn closest_proportional(&self, score: u32) -> &Glyph {
        let count = self.glyphs.len();
        let inverted = 255 - score.min(255) as usize;
        let index = ((inverted * count) / 256).min(count - 1);
        &self.glyphs[index]
    }

    /// Binary search over ascending scores.
    ///
    /// An exact match returns at once. Otherwise the last probed glyph is
    /// returned, which is a neighbor of `score` on whichever side the search
    /// ended.
    fn closest_searched(&self, score: u32) -> &Glyph {
        let mut best = &self.glyphs[0];
        let mut lower = 0isize;
        let mut upper = self.glyphs.len() as isize - 1;
        while lower <= upper {
            let index = lower + (upper - lower) / 2;
            best = &self.glyphs[index as usize];
            if best.score == score {
                return best;
            }
            if best.score < score {
                lower = index + 1;
            } else {
                upper = index - 1;
            }
        }
        best
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    pub fn kind(&self) -> &HolderKind {
        &self.kind
    }

    pub fn subset(&self) -> Option<&str> {
        match &self.kind {
            HolderKind::FixedSubset(subset) => Some(subset),
            HolderKind::FullRange => None,
        }
    }

    /// Glyphs in lookup order.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn min_intensity(&self) -> u32 {
        self.min_intensity
    }

    pub fn max_intensity(&self) -> u32 {
        self.max_intensity
    }

    /// Whether this holder serves `params` with `subset`.
    ///
    /// A fixed-subset holder matches only the same subset string; a
    /// full-range holder matches only a request without a subset.
    pub fn matches(&self, params: &RenderParams, subset: Option<&str>) -> bool {
        self.params == *params && self.subset() == subset
    }
}

/// Render and score one character.
fn create_glyph(ch: char, params: &RenderParams, renderer: &dyn GlyphRenderer) -> Result<Glyph> {
    let failed = |reason: String| MosaicError::GlyphCreationFailed {
        character: ch,
        reason,
    };
    let raster = renderer
        .render_glyph(ch, params)
        .map_err(|e| failed(e.to_string()))?;
    if raster.dimensions() != (params.glyph_width, params.glyph_height) {
        let err = RenderError::WrongSize {
            expected_width: params.glyph_width,
            expected_height: params.glyph_height,
            actual_width: raster.width(),
            actual_height: raster.height(),
        };
        return Err(failed(err.to_string()));
    }
    Glyph::new(ch, raster).map_err(|e| failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::testing::{flat_renderer, ordered_renderer};
    use crate::glyph::STANDARD_SUBSET;
    use crate::raster::PixelFormat;

    fn params() -> RenderParams {
        RenderParams::new("test", 6, 9)
    }

    #[test]
    fn test_full_range_sorted_and_complete() {
        let holder = CharacterHolder::full_range(&params(), &flat_renderer).unwrap();
        assert_eq!(holder.len(), 95);
        assert!(holder
            .glyphs()
            .windows(2)
            .all(|w| w[0].raw_score() <= w[1].raw_score()));
        // flat_renderer paints '~' darkest and ' ' lightest
        assert_eq!(holder.glyphs()[0].character(), '~');
        assert_eq!(holder.glyphs()[94].character(), ' ');
    }

    #[test]
    fn test_full_range_normalization_extremes() {
        let holder = CharacterHolder::full_range(&params(), &flat_renderer).unwrap();
        assert_eq!(holder.min_intensity(), 255 - 94 * 2);
        assert_eq!(holder.max_intensity(), 255);
        assert_eq!(holder.glyphs()[0].score(), 0);
        assert_eq!(holder.glyphs()[94].score(), 255);
        assert!(holder.glyphs().iter().all(|g| g.score() <= 255));
    }

    #[test]
    fn test_full_range_exact_match() {
        let holder = CharacterHolder::full_range(&params(), &flat_renderer).unwrap();
        for glyph in holder.glyphs() {
            assert_eq!(holder.closest(glyph.score()).score(), glyph.score());
        }
        assert_eq!(holder.closest(0).character(), '~');
        assert_eq!(holder.closest(255).character(), ' ');
    }

    #[test]
    fn test_full_range_miss_returns_neighbor() {
        let holder = CharacterHolder::full_range(&params(), &flat_renderer).unwrap();
        let scores: Vec<u32> = holder.glyphs().iter().map(Glyph::score).collect();
        for target in 0..=255u32 {
            let found = holder.closest(target).score();
            let below = scores.iter().copied().filter(|&s| s <= target).max();
            let above = scores.iter().copied().filter(|&s| s >= target).min();
            assert!(
                Some(found) == below || Some(found) == above,
                "score {target} resolved to {found}, neighbors {below:?}/{above:?}"
            );
        }
    }

    #[test]
    fn test_fixed_subset_keeps_order() {
        let renderer = ordered_renderer(STANDARD_SUBSET);
        let holder = CharacterHolder::fixed_subset(&params(), STANDARD_SUBSET, &renderer).unwrap();
        let chars: String = holder.glyphs().iter().map(Glyph::character).collect();
        assert_eq!(chars, STANDARD_SUBSET);
        assert_eq!(holder.subset(), Some(STANDARD_SUBSET));
    }

    #[test]
    fn test_fixed_subset_normalization_extremes() {
        let renderer = ordered_renderer(STANDARD_SUBSET);
        let holder = CharacterHolder::fixed_subset(&params(), STANDARD_SUBSET, &renderer).unwrap();
        assert_eq!(holder.glyphs()[0].score(), 255);
        assert_eq!(holder.glyphs()[9].score(), 0);
        assert_eq!(holder.max_intensity(), holder.glyphs()[0].raw_score());
        assert_eq!(holder.min_intensity(), holder.glyphs()[9].raw_score());
    }

    #[test]
    fn test_fixed_subset_proportional_index() {
        let renderer = ordered_renderer(STANDARD_SUBSET);
        let holder = CharacterHolder::fixed_subset(&params(), STANDARD_SUBSET, &renderer).unwrap();
        let subset: Vec<char> = STANDARD_SUBSET.chars().collect();
        // index = ((255 - score) * 10) / 256
        let cases = [
            (255, 0),
            (0, 9),
            (128, 4),
            (200, 2),
            (100, 6),
            (50, 8),
            (229, 1),
            (230, 0),
        ];
        for (score, index) in cases {
            assert_eq!(
                holder.closest(score).character(),
                subset[index],
                "score {score}"
            );
        }
    }

    #[test]
    fn test_fixed_subset_clamps_out_of_range() {
        let renderer = ordered_renderer(STANDARD_SUBSET);
        let holder = CharacterHolder::fixed_subset(&params(), STANDARD_SUBSET, &renderer).unwrap();
        assert_eq!(holder.closest(10_000).character(), ' ');
    }

    #[test]
    fn test_degenerate_range() {
        let blank = |_: char, p: &RenderParams| -> std::result::Result<RasterBuffer, RenderError> {
            Ok(RasterBuffer::filled(p.glyph_width, p.glyph_height, PixelFormat::Gray, 255))
        };
        let err = CharacterHolder::full_range(&params(), &blank).unwrap_err();
        assert!(matches!(err, MosaicError::DegenerateIntensityRange { intensity: 255 }));

        let err = CharacterHolder::fixed_subset(&params(), "ab", &blank).unwrap_err();
        assert!(matches!(err, MosaicError::DegenerateIntensityRange { .. }));
    }

    #[test]
    fn test_single_character_subset_is_degenerate() {
        let err = CharacterHolder::fixed_subset(&params(), "@", &flat_renderer).unwrap_err();
        assert!(matches!(err, MosaicError::DegenerateIntensityRange { .. }));
    }

    #[test]
    fn test_empty_subset_rejected() {
        let err = CharacterHolder::fixed_subset(&params(), "", &flat_renderer).unwrap_err();
        assert!(matches!(err, MosaicError::InvalidRequest(_)));
    }

    #[test]
    fn test_render_failure_aborts_build() {
        let failing = |ch: char, p: &RenderParams| -> std::result::Result<RasterBuffer, RenderError> {
            if ch == 'Q' {
                Err(RenderError::MissingGlyph(ch))
            } else {
                flat_renderer(ch, p)
            }
        };
        let err = CharacterHolder::full_range(&params(), &failing).unwrap_err();
        assert!(matches!(err, MosaicError::GlyphCreationFailed { character: 'Q', .. }));
    }

    #[test]
    fn test_wrong_raster_size_fails() {
        let small = |_: char, _: &RenderParams| -> std::result::Result<RasterBuffer, RenderError> {
            Ok(RasterBuffer::filled(2, 2, PixelFormat::Gray, 0))
        };
        let err = CharacterHolder::fixed_subset(&params(), " @", &small).unwrap_err();
        match err {
            MosaicError::GlyphCreationFailed { character, reason } => {
                assert_eq!(character, ' ');
                assert!(reason.contains("expected 6x9"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_matches() {
        let renderer = ordered_renderer(STANDARD_SUBSET);
        let fixed = CharacterHolder::fixed_subset(&params(), STANDARD_SUBSET, &renderer).unwrap();
        let full = CharacterHolder::full_range(&params(), &flat_renderer).unwrap();
        assert!(fixed.matches(&params(), Some(STANDARD_SUBSET)));
        assert!(!fixed.matches(&params(), Some(" o@")));
        assert!(!fixed.matches(&params(), None));
        assert!(full.matches(&params(), None));
        assert!(!full.matches(&params(), Some(STANDARD_SUBSET)));
        assert!(!full.matches(&RenderParams::new("other", 6, 9), None));
    }
}
