//! ascii-mosaic library crate.
//!
//! Converts raster images into ASCII-art mosaics, where every block of
//! pixels becomes the printable character whose ink density best matches
//! it, or into pixelization mosaics of block-average colors.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ascii_mosaic::convert::{ConversionRequest, ConversionService, Mode};
//! use ascii_mosaic::glyph::{FontRenderer, STANDARD_SUBSET};
//! use ascii_mosaic::io::{load_image, save_image};
//!
//! # fn main() -> ascii_mosaic::Result<()> {
//! let renderer = FontRenderer::from_path(Path::new("mono.ttf"))?;
//! let request = ConversionRequest::new(Mode::AsciiArt, renderer.params(8))
//!     .with_subset(STANDARD_SUBSET);
//! let service = ConversionService::new(renderer);
//!
//! let image = load_image(Path::new("photo.png"))?;
//! let art = service.convert(&request, Some(&image))?;
//! save_image(&art, Path::new("art.png"))?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod glyph;
pub mod io;
pub mod raster;

pub use error::{MosaicError, RasterError, RenderError, Result};
