//! Pixelization: fill each block with its average color.

use rayon::prelude::*;

use crate::error::{MosaicError, Result};
use crate::raster::{PixelFormat, RasterBuffer, Rect};

/// Replace every `block_size` x `block_size` block with its mean color.
///
/// Blocks start at multiples of `block_size`. Blocks at the right and bottom
/// edges are clipped to the image and averaged over the pixels they
/// actually contain. The output is always RGB with the source's dimensions.
///
/// Each horizontal band of blocks is independent, so bands are filled in
/// parallel.
///
/// # Errors
/// `InvalidRequest` for a zero block size.
pub fn render(src: &RasterBuffer, block_size: u32) -> Result<RasterBuffer> {
    if block_size == 0 {
        return Err(MosaicError::InvalidRequest(
            "pixelization block size must be at least 1".to_string(),
        ));
    }

    let (width, height) = src.dimensions();
    let mut dest = RasterBuffer::new(width, height, PixelFormat::Rgb);
    if width == 0 || height == 0 {
        return Ok(dest);
    }

    let row_len = dest.row_len();
    let (data, stride) = dest.storage_mut();
    data.par_chunks_mut(stride * block_size as usize)
        .enumerate()
        .try_for_each(|(band, rows)| -> Result<()> {
            let y0 = band as u32 * block_size;
            let band_height = block_size.min(height - y0);
            let mut x0 = 0u32;
            while x0 < width {
                let block_width = block_size.min(width - x0);
                let rect = Rect::new(x0, y0, block_width, band_height);
                let average = src.view(rect)?.average_rgb();

                let start = x0 as usize * 3;
                let end = start + block_width as usize * 3;
                for row in rows.chunks_mut(stride) {
                    for px in row[start..end.min(row_len)].chunks_exact_mut(3) {
                        px.copy_from_slice(&average);
                    }
                }
                x0 += block_width;
            }
            Ok(())
        })?;

    log::debug!("Pixelized {}x{} image with {}px blocks", width, height, block_size);
    Ok(dest)
}
