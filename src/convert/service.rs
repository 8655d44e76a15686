//! The `convert` entry point.

use std::fmt;
use std::sync::Arc;

use super::{ascii, pixelize};
use crate::error::{MosaicError, Result};
use crate::glyph::{CharacterHolder, GlyphRenderer, HolderCache, RenderParams};
use crate::raster::{to_grayscale, RasterBuffer, Rect};

/// Conversion style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    AsciiArt,
    Pixelization,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::AsciiArt => write!(f, "ascii"),
            Mode::Pixelization => write!(f, "pixelize"),
        }
    }
}

/// Everything a single `convert` call needs besides the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub mode: Mode,
    /// Glyph box for ASCII art. Pixelization uses `glyph_width` as block size.
    pub params: RenderParams,
    /// Restricts ASCII art to these characters. `None` uses every printable.
    pub subset: Option<String>,
    /// Tint inked glyph pixels with the block's average color.
    pub color: bool,
    /// Convert only this part of the image.
    pub target: Option<Rect>,
}

impl ConversionRequest {
    pub fn new(mode: Mode, params: RenderParams) -> Self {
        Self {
            mode,
            params,
            subset: None,
            color: false,
            target: None,
        }
    }

    pub fn with_subset(mut self, subset: impl Into<String>) -> Self {
        self.subset = Some(subset.into());
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_target(mut self, target: Rect) -> Self {
        self.target = Some(target);
        self
    }
}

/// Converts images, reusing character holders across calls.
///
/// The service owns the glyph renderer and a [`HolderCache`]. Services built
/// with [`ConversionService::with_cache`] share holders with each other.
pub struct ConversionService {
    renderer: Box<dyn GlyphRenderer + Send + Sync>,
    cache: Arc<HolderCache>,
}

impl fmt::Debug for ConversionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionService")
            .field("cached_holders", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl ConversionService {
    pub fn new(renderer: impl GlyphRenderer + Send + Sync + 'static) -> Self {
        Self::with_cache(renderer, Arc::new(HolderCache::new()))
    }

    pub fn with_cache(
        renderer: impl GlyphRenderer + Send + Sync + 'static,
        cache: Arc<HolderCache>,
    ) -> Self {
        Self {
            renderer: Box::new(renderer),
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<HolderCache> {
        &self.cache
    }

    /// Cached holder for `params` and `subset`, built on first request.
    pub fn holder(
        &self,
        params: &RenderParams,
        subset: Option<&str>,
    ) -> Result<Arc<CharacterHolder>> {
        self.cache.get_or_build(params, subset, self.renderer.as_ref())
    }

    /// Convert `source` as described by `request`.
    ///
    /// The result is an RGB buffer with the source's dimensions. With a
    /// target rectangle only that region is converted; the rest of the image
    /// is copied through.
    ///
    /// # Errors
    /// - `InvalidRequest` for a missing image, a bad glyph box, an empty
    ///   subset or a target outside the image
    /// - `GlyphCreationFailed` / `DegenerateIntensityRange` from the holder
    ///   build; nothing is cached in that case
    pub fn convert(
        &self,
        request: &ConversionRequest,
        source: Option<&RasterBuffer>,
    ) -> Result<RasterBuffer> {
        let source = source.ok_or_else(|| {
            MosaicError::InvalidRequest(format!("{} conversion needs a source image", request.mode))
        })?;
        request.params.validate()?;

        let (width, height) = source.dimensions();
        let region = match request.target {
            Some(rect) if !rect.fits_within(width, height) => {
                return Err(MosaicError::InvalidRequest(format!(
                    "target {} lies outside the {}x{} image",
                    rect, width, height
                )));
            }
            Some(rect) => rect,
            None => Rect::full(width, height),
        };

        let output = match request.mode {
            Mode::AsciiArt => {
                let holder = self.holder(&request.params, request.subset.as_deref())?;
                convert_region(source, region, |color| {
                    let gray = to_grayscale(color);
                    ascii::render(color, &gray, &holder, request.color)
                })?
            }
            Mode::Pixelization => convert_region(source, region, |color| {
                pixelize::render(color, request.params.glyph_width)
            })?,
        };

        log::info!(
            "Converted {}x{} image ({}, region {})",
            width,
            height,
            request.mode,
            region
        );
        Ok(output)
    }
}

/// Run `engine` over `region` of `source` and paste the result back.
fn convert_region<F>(source: &RasterBuffer, region: Rect, engine: F) -> Result<RasterBuffer>
where
    F: FnOnce(&RasterBuffer) -> Result<RasterBuffer>,
{
    if region == Rect::full(source.width(), source.height()) {
        return engine(source);
    }

    let cropped = source.crop(region)?;
    let converted = engine(&cropped)?;
    let mut output = source.to_rgb();
    output.blit(&converted, region.x, region.y)?;
    Ok(output)
}
