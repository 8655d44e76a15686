//! Image file loading and saving.
//!
//! Codecs come from the `image` crate. The output format follows the file
//! extension (png, jpg, bmp, ...).

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageError, RgbImage};

use crate::error::{MosaicError, Result};
use crate::raster::{PixelFormat, RasterBuffer};

/// Load an image file as a raster.
///
/// 8-bit grayscale files stay single-channel; everything else is converted
/// to 8-bit RGB (alpha is dropped).
pub fn load_image(path: &Path) -> Result<RasterBuffer> {
    let image = image::open(path).map_err(|e| io_error(path, e))?;
    let (width, height) = (image.width(), image.height());
    let buffer = match image {
        DynamicImage::ImageLuma8(gray) => RasterBuffer::from_samples(
            width,
            height,
            gray.sample_layout().channels,
            gray.into_raw(),
        )?,
        DynamicImage::ImageRgb8(rgb) => RasterBuffer::from_samples(
            width,
            height,
            rgb.sample_layout().channels,
            rgb.into_raw(),
        )?,
        other => RasterBuffer::from_packed(width, height, PixelFormat::Rgb, other.to_rgb8().into_raw())?,
    };
    log::debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        width,
        height,
        buffer.format()
    );
    Ok(buffer)
}

/// Write a raster to `path`, encoding by the file extension.
pub fn save_image(buffer: &RasterBuffer, path: &Path) -> Result<()> {
    let (width, height) = buffer.dimensions();
    let packed = buffer.to_packed();
    let result = match buffer.format() {
        PixelFormat::Gray => GrayImage::from_raw(width, height, packed).map(|img| img.save(path)),
        PixelFormat::Rgb => RgbImage::from_raw(width, height, packed).map(|img| img.save(path)),
    };
    match result {
        Some(saved) => saved.map_err(|e| io_error(path, e))?,
        None => {
            return Err(MosaicError::InvalidRequest(format!(
                "raster {}x{} does not fit its sample data",
                width, height
            )))
        }
    }
    log::debug!("Saved {} ({}x{})", path.display(), width, height);
    Ok(())
}

fn io_error(path: &Path, err: ImageError) -> MosaicError {
    match err {
        ImageError::IoError(source) => MosaicError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => MosaicError::Image(other),
    }
}
