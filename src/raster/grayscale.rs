//! Channel-average grayscale reduction.

use rayon::prelude::*;

use super::buffer::{average_rgb, PixelFormat, RasterBuffer};

/// Reduce a buffer to gray by averaging its channels.
///
/// Each output pixel has every channel set to `floor((R + G + B) / 3)` of
/// the input pixel. The output keeps the input's dimensions and pixel
/// format; a gray input is copied as-is. The input is never modified.
///
/// Rows are processed in parallel since each output row depends only on
/// the matching input row.
pub fn to_grayscale(src: &RasterBuffer) -> RasterBuffer {
    let (width, height) = src.dimensions();
    let format = src.format();
    let mut out = RasterBuffer::new(width, height, format);
    if width == 0 || height == 0 {
        return out;
    }

    let rows: Vec<&[u8]> = src.rows().collect();
    let row_len = out.row_len();
    let (data, stride) = out.storage_mut();
    data.par_chunks_mut(stride)
        .zip(rows.par_iter())
        .for_each(|(dst, src_row)| match format {
            PixelFormat::Gray => dst[..row_len].copy_from_slice(src_row),
            PixelFormat::Rgb => {
                for (d, s) in dst[..row_len]
                    .chunks_exact_mut(3)
                    .zip(src_row.chunks_exact(3))
                {
                    d.fill(average_rgb([s[0], s[1], s[2]]));
                }
            }
        });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Rect;

    #[test]
    fn test_average_is_floored() {
        let src = RasterBuffer::from_fn(2, 1, PixelFormat::Rgb, |x, _| {
            if x == 0 {
                [255, 0, 0]
            } else {
                [1, 1, 2]
            }
        });
        let gray = to_grayscale(&src);
        assert_eq!(gray.rgb(0, 0).unwrap(), [85, 85, 85]);
        assert_eq!(gray.rgb(1, 0).unwrap(), [1, 1, 1]);
    }

    #[test]
    fn test_keeps_dimensions_and_format() {
        let src = RasterBuffer::new(7, 3, PixelFormat::Rgb);
        let gray = to_grayscale(&src);
        assert_eq!(gray.dimensions(), (7, 3));
        assert_eq!(gray.format(), PixelFormat::Rgb);
    }

    #[test]
    fn test_input_untouched() {
        let src = RasterBuffer::from_fn(4, 4, PixelFormat::Rgb, |x, y| {
            [(x * 60) as u8, (y * 60) as u8, 10]
        });
        let copy = src.clone();
        let _ = to_grayscale(&src);
        assert_eq!(src, copy);
    }

    #[test]
    fn test_idempotent() {
        let src = RasterBuffer::from_fn(9, 5, PixelFormat::Rgb, |x, y| {
            [(x * 29) as u8, (y * 51) as u8, ((x * y) % 256) as u8]
        });
        let once = to_grayscale(&src);
        let twice = to_grayscale(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_gray_input_is_copied() {
        let src = RasterBuffer::from_fn(3, 3, PixelFormat::Gray, |x, y| [(x + y * 3) as u8; 3]);
        assert_eq!(to_grayscale(&src), src);
    }

    #[test]
    fn test_padded_source() {
        let data = vec![
            30, 60, 90, 0, 0, // row 0 + 2 bytes padding
            3, 6, 9, 0, 0, // row 1
        ];
        let src = RasterBuffer::from_raw(1, 2, PixelFormat::Rgb, 5, data).unwrap();
        let gray = to_grayscale(&src);
        assert_eq!(gray.sample(0, 0).unwrap(), 60);
        assert_eq!(gray.sample(0, 1).unwrap(), 6);
        let view = gray.view(Rect::full(1, 2)).unwrap();
        assert_eq!(view.average_rgb(), [33, 33, 33]);
    }
}
