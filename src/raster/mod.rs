//! Raster buffers and the grayscale feeding stage.
//!
//! [`RasterBuffer`] is the pixel container every other stage reads and
//! writes. It stores 8-bit samples in either one (gray) or three (RGB)
//! channels, with an explicit row stride, and exposes bounds-checked pixel,
//! row and sub-rectangle accessors instead of raw pointers.

mod buffer;
mod grayscale;
mod rect;

pub use buffer::{average_rgb, PixelFormat, RasterBuffer, RasterView, Rgb, WHITE};
pub use grayscale::to_grayscale;
pub use rect::Rect;
