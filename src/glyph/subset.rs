//! Built-in character subsets for fixed-subset holders.

/// Ten-level ramp, ordered from the lightest glyph to the darkest.
pub const STANDARD_SUBSET: &str = " .,:;ox%#@";

/// Three-level ramp for a sparse, high-contrast look.
pub const MINIMAL_SUBSET: &str = " o@";

/// Character set a conversion draws glyphs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subset {
    /// Every printable ASCII character, ordered by measured ink
    #[default]
    All,
    /// Ten-level ramp
    Standard,
    /// Three-level ramp
    Minimal,
}

impl Subset {
    /// Characters of a fixed subset, or `None` for the full printable range.
    pub fn chars(&self) -> Option<&'static str> {
        match self {
            Subset::All => None,
            Subset::Standard => Some(STANDARD_SUBSET),
            Subset::Minimal => Some(MINIMAL_SUBSET),
        }
    }

    /// Get a human-readable name for the subset.
    pub fn name(&self) -> &'static str {
        match self {
            Subset::All => "all",
            Subset::Standard => "standard",
            Subset::Minimal => "minimal",
        }
    }

    /// Look a subset up by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        [Subset::All, Subset::Standard, Subset::Minimal]
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}
