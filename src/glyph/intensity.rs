//! Zone-weighted ink density of a glyph-sized raster.
//!
//! A raster is split on a 3x3 grid into five zones: a top and a bottom
//! strip spanning the full width, a left and a right strip spanning the
//! full height, and the center cell. The four corner cells belong to both
//! a horizontal and a vertical strip, so their ink is counted twice. Every
//! glyph and every image block is scored the same way, which keeps scores
//! comparable across the two.

use crate::error::RasterError;
use crate::raster::{RasterBuffer, Rect};

/// Zone sizes for a `width` x `height` raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneLayout {
    width: u32,
    height: u32,
    /// Width of the left and right strips.
    pub side_width: u32,
    /// Height of the top and bottom strips.
    pub strip_height: u32,
    pub center_width: u32,
    pub center_height: u32,
}

/// Split one dimension into (minor strip, center) sizes.
///
/// Divisible dimensions split evenly. Otherwise the strips take
/// `floor(dim / 3)` and the center takes what is left; both are at least 1.
fn split(dim: u32) -> (u32, u32) {
    if dim % 3 == 0 {
        (dim / 3, dim / 3)
    } else {
        let minor = (dim / 3).max(1);
        let center = dim.saturating_sub(2 * minor).max(1);
        (minor, center)
    }
}

impl ZoneLayout {
    pub fn new(width: u32, height: u32) -> Self {
        let (side_width, center_width) = split(width);
        let (strip_height, center_height) = split(height);
        Self {
            width,
            height,
            side_width,
            strip_height,
            center_width,
            center_height,
        }
    }

    pub fn top(&self) -> Rect {
        Rect::new(0, 0, self.width, self.strip_height)
    }

    pub fn bottom(&self) -> Rect {
        Rect::new(0, self.height - self.strip_height, self.width, self.strip_height)
    }

    pub fn left(&self) -> Rect {
        Rect::new(0, 0, self.side_width, self.height)
    }

    pub fn right(&self) -> Rect {
        Rect::new(self.width - self.side_width, 0, self.side_width, self.height)
    }

    /// The center cell.
    ///
    /// On 1-pixel dimensions the clamped center would start past the edge,
    /// so its origin is pulled back inside the raster.
    pub fn center(&self) -> Rect {
        let x = self.side_width.min(self.width - self.center_width);
        let y = self.strip_height.min(self.height - self.center_height);
        Rect::new(x, y, self.center_width, self.center_height)
    }

    /// Zones in scoring order: top, left, right, bottom, center.
    pub fn zones(&self) -> [Rect; 5] {
        [
            self.top(),
            self.left(),
            self.right(),
            self.bottom(),
            self.center(),
        ]
    }

    /// Number of pixel visits a full score makes.
    pub fn visit_count(&self) -> u64 {
        let strip = self.width as u64 * self.strip_height as u64;
        let side = self.side_width as u64 * self.height as u64;
        let center = self.center_width as u64 * self.center_height as u64;
        2 * strip + 2 * side + center
    }
}

/// Sum of first-channel samples inside `rect`.
fn zone_sum(raster: &RasterBuffer, rect: Rect) -> Result<u64, RasterError> {
    let view = raster.view(rect)?;
    let channels = raster.channels();
    Ok(view
        .rows()
        .map(|row| row.iter().step_by(channels).map(|&v| v as u64).sum::<u64>())
        .sum())
}

/// Ink density of a raster: the zone-weighted average sample value.
///
/// Lower scores are darker (a sample of 0 is black). Only the first channel
/// is read, so callers pass gray or gray-replicated rasters. An empty raster
/// scores 0.
///
/// # Errors
/// A zone reaching outside the raster is reported, never skipped.
pub fn score(raster: &RasterBuffer) -> Result<u32, RasterError> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Ok(0);
    }
    let layout = ZoneLayout::new(width, height);
    let mut total = 0u64;
    for zone in layout.zones() {
        total += zone_sum(raster, zone)?;
    }
    Ok((total / layout.visit_count()) as u32)
}
