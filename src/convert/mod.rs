//! Image conversion engines and the service that drives them.
//!
//! - [`ascii`] tiles an image with glyphs picked by intensity
//! - [`pixelize`] replaces each block with its average color
//! - [`ConversionService`] validates a request, builds or reuses the
//!   character holder and runs the engine over the requested region

pub mod ascii;
pub mod pixelize;
mod service;

pub use ascii::{block_grid, block_starts, describe_block, Block};
pub use service::{ConversionRequest, ConversionService, Mode};
