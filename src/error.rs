//! Error types for raster processing and conversion.

use std::path::PathBuf;

/// Errors raised by [`RasterBuffer`](crate::raster::RasterBuffer) construction and access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    #[error("pixel ({x}, {y}) is outside a {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("rectangle {rect} does not fit inside a {width}x{height} buffer")]
    RectOutOfBounds {
        rect: crate::raster::Rect,
        width: u32,
        height: u32,
    },

    #[error("stride {stride} is smaller than a row of {row_len} bytes")]
    StrideTooSmall { stride: usize, row_len: usize },

    #[error("sample storage holds {actual} bytes, expected at least {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("unsupported channel count {0} (expected 1 or 3)")]
    UnsupportedChannels(u8),
}

/// Errors a glyph renderer may report for a single character.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to load font: {0}")]
    FontLoad(String),

    #[error("font has no glyph for {0:?}")]
    MissingGlyph(char),

    #[error("rendered raster is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    WrongSize {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Errors that abort a conversion.
#[derive(Debug, thiserror::Error)]
pub enum MosaicError {
    /// Rendering or scoring a character failed; the holder build is abandoned.
    #[error("glyph creation failed for {character:?}: {reason}")]
    GlyphCreationFailed { character: char, reason: String },

    /// Every glyph in a holder scored the same, normalization has no range.
    #[error("all glyphs share raw intensity {intensity}, cannot normalize")]
    DegenerateIntensityRange { intensity: u32 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MosaicError>;
