//! ASCII-art tiling and compositing.
//!
//! The source is walked in glyph-sized blocks, row by row. Each block is
//! scored on the grayscale copy of the image, the holder picks the glyph
//! with the nearest score, and the glyph shape is stamped into the
//! destination. In color mode inked glyph pixels take the block's average
//! color and background pixels turn white; in monochrome mode the glyph's
//! own pixels are copied.
//!
//! Blocks never shrink at the right or bottom edge. When the remaining strip
//! is narrower than a block, the last block is moved back so that it ends
//! on the image edge, overlapping its neighbor.

use crate::error::{MosaicError, Result};
use crate::glyph::{intensity, CharacterHolder};
use crate::raster::{PixelFormat, RasterBuffer, Rect, Rgb, WHITE};

/// Scoring data for one block of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub rect: Rect,
    /// Zone-model score of the block's grayscale pixels.
    pub score: u32,
    /// Per-channel mean of the block's original pixels.
    pub average: Rgb,
}

/// Start offsets of the blocks along one axis.
///
/// Blocks advance by `block` until the next one would overhang `extent`;
/// that one is instead placed at `extent - block`. Requires
/// `0 < block <= extent`, otherwise no starts are produced.
///
/// # Example
/// ```
/// use ascii_mosaic::convert::block_starts;
///
/// assert_eq!(block_starts(25, 10), vec![0, 10, 15]);
/// assert_eq!(block_starts(20, 10), vec![0, 10]);
/// ```
pub fn block_starts(extent: u32, block: u32) -> Vec<u32> {
    let mut starts = Vec::new();
    if block == 0 || block > extent {
        return starts;
    }

    let mut start = 0u32;
    while start < extent {
        starts.push(start);
        let next = start + block;
        start = if start + 2 * block > extent && next != extent {
            extent - block
        } else {
            next
        };
    }
    starts
}

/// Block rectangles covering a `width` x `height` image in row-major order.
pub fn block_grid(width: u32, height: u32, block_width: u32, block_height: u32) -> Vec<Rect> {
    let xs = block_starts(width, block_width);
    let ys = block_starts(height, block_height);
    ys.iter()
        .flat_map(|&y| {
            xs.iter()
                .map(move |&x| Rect::new(x, y, block_width, block_height))
        })
        .collect()
}

/// Score one block and measure its average color.
pub fn describe_block(color: &RasterBuffer, gray: &RasterBuffer, rect: Rect) -> Result<Block> {
    let average = color.view(rect)?.average_rgb();
    let sample = gray.crop(rect)?;
    Ok(Block {
        rect,
        score: intensity::score(&sample)?,
        average,
    })
}

/// Render `color` as ASCII art.
///
/// `gray` must be the grayscale reduction of `color`. The glyph box of
/// `holder` is the block size. The result is an RGB buffer with the
/// source's dimensions. An image smaller than one block in either
/// direction is returned unchanged (as RGB).
///
/// # Errors
/// `InvalidRequest` when the two sources differ in size.
pub fn render(
    color: &RasterBuffer,
    gray: &RasterBuffer,
    holder: &CharacterHolder,
    color_mode: bool,
) -> Result<RasterBuffer> {
    if color.dimensions() != gray.dimensions() {
        return Err(MosaicError::InvalidRequest(format!(
            "color source is {}x{} but grayscale source is {}x{}",
            color.width(),
            color.height(),
            gray.width(),
            gray.height()
        )));
    }

    let (width, height) = color.dimensions();
    let block_width = holder.params().glyph_width;
    let block_height = holder.params().glyph_height;
    if block_width > width || block_height > height {
        log::info!(
            "Region {}x{} is smaller than the {}x{} glyph box, leaving it unchanged",
            width,
            height,
            block_width,
            block_height
        );
        return Ok(color.to_rgb());
    }

    let grid = block_grid(width, height, block_width, block_height);
    log::debug!(
        "Tiling {}x{} image into {} blocks of {}x{}",
        width,
        height,
        grid.len(),
        block_width,
        block_height
    );

    let mut dest = RasterBuffer::new(width, height, PixelFormat::Rgb);
    for rect in grid {
        let block = describe_block(color, gray, rect)?;
        let glyph = holder.closest(block.score);
        composite(&mut dest, glyph.raster(), &block, color_mode)?;
    }
    Ok(dest)
}

/// Stamp a glyph raster over `block.rect` in `dest`.
fn composite(
    dest: &mut RasterBuffer,
    glyph: &RasterBuffer,
    block: &Block,
    color_mode: bool,
) -> Result<()> {
    let Rect { x, y, width, height } = block.rect;
    for gy in 0..height {
        for gx in 0..width {
            let rgb = if color_mode {
                if glyph.sample(gx, gy)? < u8::MAX {
                    block.average
                } else {
                    WHITE
                }
            } else {
                glyph.rgb(gx, gy)?
            };
            dest.set_rgb(x + gx, y + gy, rgb)?;
        }
    }
    Ok(())
}
