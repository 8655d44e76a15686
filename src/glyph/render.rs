//! Glyph rendering collaborator.
//!
//! The conversion core never draws text itself. It asks a [`GlyphRenderer`]
//! for a raster of one character at a fixed glyph box and scores whatever
//! comes back. [`FontRenderer`] is the stock implementation backed by a
//! TrueType/OpenType font; tests and embedders can pass a closure instead.

use std::fmt;
use std::path::Path;

use fontdue::{Font, FontSettings};

use crate::error::{MosaicError, RenderError};
use crate::raster::{PixelFormat, RasterBuffer};

/// Rendering parameters that identify one glyph set.
///
/// `font` is an identity label (typically the font path); two parameter
/// sets with the same label and glyph box produce interchangeable glyphs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderParams {
    pub font: String,
    pub glyph_width: u32,
    pub glyph_height: u32,
}

impl RenderParams {
    pub fn new(font: impl Into<String>, glyph_width: u32, glyph_height: u32) -> Self {
        Self {
            font: font.into(),
            glyph_width,
            glyph_height,
        }
    }

    /// Reject glyph boxes that cannot hold a pixel.
    pub fn validate(&self) -> Result<(), MosaicError> {
        if self.glyph_width == 0 || self.glyph_height == 0 {
            return Err(MosaicError::InvalidRequest(format!(
                "glyph box must be at least 1x1, got {}x{}",
                self.glyph_width, self.glyph_height
            )));
        }
        Ok(())
    }
}

impl fmt::Display for RenderParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}x{}", self.font, self.glyph_width, self.glyph_height)
    }
}

/// Renders a single character to a `glyph_width` x `glyph_height` raster.
///
/// Implementations draw dark ink on a white (255) background.
pub trait GlyphRenderer {
    fn render_glyph(&self, ch: char, params: &RenderParams) -> Result<RasterBuffer, RenderError>;
}

impl<F> GlyphRenderer for F
where
    F: Fn(char, &RenderParams) -> Result<RasterBuffer, RenderError>,
{
    fn render_glyph(&self, ch: char, params: &RenderParams) -> Result<RasterBuffer, RenderError> {
        self(ch, params)
    }
}

/// Glyph renderer backed by a fontdue font.
pub struct FontRenderer {
    font: Font,
    label: String,
}

impl FontRenderer {
    /// Parse font data. `label` becomes [`RenderParams::font`].
    pub fn from_bytes(bytes: Vec<u8>, label: impl Into<String>) -> Result<Self, RenderError> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| RenderError::FontLoad(e.to_string()))?;
        Ok(Self {
            font,
            label: label.into(),
        })
    }

    /// Load a font file; the path doubles as the identity label.
    pub fn from_path(path: &Path) -> Result<Self, MosaicError> {
        let bytes = std::fs::read(path).map_err(|source| MosaicError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let renderer = Self::from_bytes(bytes, path.display().to_string()).map_err(|e| {
            MosaicError::InvalidRequest(format!("{}: {}", path.display(), e))
        })?;
        Ok(renderer)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Glyph box for a font size: `size` pixels wide and one line tall.
    pub fn params(&self, size: u32) -> RenderParams {
        let px = size as f32;
        let line = self
            .font
            .horizontal_line_metrics(px)
            .map(|m| m.new_line_size.ceil() as u32)
            .unwrap_or(size);
        RenderParams::new(self.label.clone(), size, line.max(1))
    }

    fn ascent(&self, px: f32) -> i32 {
        self.font
            .horizontal_line_metrics(px)
            .map(|m| m.ascent.round() as i32)
            .unwrap_or(px as i32)
    }
}

impl GlyphRenderer for FontRenderer {
    fn render_glyph(&self, ch: char, params: &RenderParams) -> Result<RasterBuffer, RenderError> {
        if ch != ' ' && self.font.lookup_glyph_index(ch) == 0 {
            return Err(RenderError::MissingGlyph(ch));
        }

        let (width, height) = (params.glyph_width, params.glyph_height);
        let mut raster = RasterBuffer::filled(width, height, PixelFormat::Gray, 255);

        let px = width as f32;
        let (metrics, coverage) = self.font.rasterize(ch, px);
        let baseline = self.ascent(px);
        let left = (width as i32 - metrics.width as i32) / 2;
        let top = baseline - metrics.ymin - metrics.height as i32;

        for gy in 0..metrics.height {
            for gx in 0..metrics.width {
                let x = left + gx as i32;
                let y = top + gy as i32;
                if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                    continue;
                }
                let alpha = coverage[gy * metrics.width + gx];
                raster.pixel_mut(x as u32, y as u32)?[0] = 255 - alpha;
            }
        }

        Ok(raster)
    }
}
