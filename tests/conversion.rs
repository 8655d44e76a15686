//! End-to-end tests for the conversion service.
//!
//! Glyphs come from synthetic closure renderers so no font file is needed:
//! - Full-range and fixed-subset ASCII art
//! - Pixelization
//! - Selected-area conversion
//! - Error propagation

use std::sync::Arc;

use ascii_mosaic::convert::{block_starts, ConversionRequest, ConversionService, Mode};
use ascii_mosaic::glyph::{HolderCache, RenderParams, STANDARD_SUBSET};
use ascii_mosaic::io::{load_image, save_image};
use ascii_mosaic::raster::{to_grayscale, PixelFormat, RasterBuffer, Rect, WHITE};
use ascii_mosaic::{MosaicError, RenderError};
use tempfile::TempDir;

/// Flat gray glyphs that get darker with the character code.
fn ramp(ch: char, params: &RenderParams) -> Result<RasterBuffer, RenderError> {
    let code = (ch as u32).clamp(32, 126);
    Ok(RasterBuffer::filled(
        params.glyph_width,
        params.glyph_height,
        PixelFormat::Gray,
        (255 - 2 * (code - 32)) as u8,
    ))
}

/// White glyph with a black ring for '#', plain white for everything else.
fn ring(ch: char, params: &RenderParams) -> Result<RasterBuffer, RenderError> {
    let (w, h) = (params.glyph_width, params.glyph_height);
    Ok(RasterBuffer::from_fn(w, h, PixelFormat::Gray, |x, y| {
        let edge = x == 0 || y == 0 || x == w - 1 || y == h - 1;
        if ch == '#' && edge {
            [0; 3]
        } else {
            WHITE
        }
    }))
}

fn params(size: u32) -> RenderParams {
    RenderParams::new("synthetic", size, size)
}

// ==================== ASCII Art ====================

#[test]
fn test_black_image_gets_darkest_printable() {
    let service = ConversionService::new(ramp);
    let source = RasterBuffer::new(3, 3, PixelFormat::Rgb);
    let darkest = (255 - 2 * (126 - 32)) as u8;

    for color in [false, true] {
        let request = ConversionRequest::new(Mode::AsciiArt, params(3)).with_color(color);
        let out = service.convert(&request, Some(&source)).unwrap();
        let expected = if color { [0; 3] } else { [darkest; 3] };
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(out.rgb(x, y).unwrap(), expected, "color={color}");
            }
        }
    }
    assert_eq!(service.cache().len(), 1);
}

#[test]
fn test_white_image_gets_space() {
    let service = ConversionService::new(ramp);
    let source = RasterBuffer::filled(12, 8, PixelFormat::Rgb, 255);
    let request = ConversionRequest::new(Mode::AsciiArt, params(4));
    let out = service.convert(&request, Some(&source)).unwrap();
    assert!(out.to_packed().iter().all(|&v| v == 255));
}

#[test]
fn test_fixed_subset_draws_glyph_shapes() {
    let service = ConversionService::new(ring);
    let source = RasterBuffer::new(8, 4, PixelFormat::Rgb);
    let request = ConversionRequest::new(Mode::AsciiArt, params(4)).with_subset(" #");
    let out = service.convert(&request, Some(&source)).unwrap();

    // Each 4x4 block of the black image becomes a ring.
    for bx in [0, 4] {
        assert_eq!(out.rgb(bx, 0).unwrap(), [0; 3]);
        assert_eq!(out.rgb(bx + 3, 3).unwrap(), [0; 3]);
        assert_eq!(out.rgb(bx + 1, 1).unwrap(), WHITE);
        assert_eq!(out.rgb(bx + 2, 2).unwrap(), WHITE);
    }
}

#[test]
fn test_color_mode_tints_ring() {
    let service = ConversionService::new(ring);
    let source = RasterBuffer::from_fn(4, 4, PixelFormat::Rgb, |_, _| [60, 0, 0]);
    let request = ConversionRequest::new(Mode::AsciiArt, params(4))
        .with_subset(" #")
        .with_color(true);
    let out = service.convert(&request, Some(&source)).unwrap();
    assert_eq!(out.rgb(0, 0).unwrap(), [60, 0, 0]);
    assert_eq!(out.rgb(1, 1).unwrap(), WHITE);
}

#[test]
fn test_output_keeps_odd_dimensions() {
    let service = ConversionService::new(ramp);
    let source = RasterBuffer::filled(97, 23, PixelFormat::Rgb, 90);
    let request = ConversionRequest::new(Mode::AsciiArt, params(10)).with_subset(STANDARD_SUBSET);
    let out = service.convert(&request, Some(&source)).unwrap();
    assert_eq!(out.dimensions(), (97, 23));
    assert_eq!(out.format(), PixelFormat::Rgb);

    let starts = block_starts(97, 10);
    assert_eq!(starts.last().copied(), Some(87));
    assert_eq!(starts.len(), 10);
}

// ==================== Pixelization ====================

#[test]
fn test_pixelize_white_with_unit_blocks() {
    let service = ConversionService::new(ramp);
    let source = RasterBuffer::filled(3, 3, PixelFormat::Rgb, 255);
    let request = ConversionRequest::new(Mode::Pixelization, params(1));
    let out = service.convert(&request, Some(&source)).unwrap();
    assert_eq!(out, source);
}

#[test]
fn test_pixelize_uniform_any_size() {
    let service = ConversionService::new(ramp);
    for (w, h, block) in [(1, 1, 8), (17, 5, 4), (32, 32, 8), (9, 40, 7)] {
        let source = RasterBuffer::from_fn(w, h, PixelFormat::Rgb, |_, _| [12, 34, 56]);
        let request = ConversionRequest::new(Mode::Pixelization, params(block));
        let out = service.convert(&request, Some(&source)).unwrap();
        assert_eq!(out, source, "{w}x{h} block {block}");
    }
}

// ==================== Selected Area ====================

#[test]
fn test_selected_area_from_drag_corners() {
    let service = ConversionService::new(ramp);
    let source = RasterBuffer::filled(10, 10, PixelFormat::Rgb, 255);
    let region = Rect::from_corners((8, 6), (2, 2));
    assert_eq!(region, Rect::new(2, 2, 6, 4));

    let request = ConversionRequest::new(Mode::Pixelization, params(2)).with_target(region);
    let out = service.convert(&request, Some(&source)).unwrap();
    assert_eq!(out, source);
}

#[test]
fn test_selected_area_only_touches_region() {
    let service = ConversionService::new(ramp);
    let source = RasterBuffer::from_fn(6, 6, PixelFormat::Rgb, |x, _| {
        if x < 3 {
            [0; 3]
        } else {
            [200; 3]
        }
    });
    let request =
        ConversionRequest::new(Mode::Pixelization, params(6)).with_target(Rect::new(0, 0, 6, 2));
    let out = service.convert(&request, Some(&source)).unwrap();
    assert_eq!(out.rgb(0, 0).unwrap(), [100; 3]);
    assert_eq!(out.rgb(5, 1).unwrap(), [100; 3]);
    assert_eq!(out.rgb(0, 2).unwrap(), [0; 3]);
    assert_eq!(out.rgb(5, 5).unwrap(), [200; 3]);
}

#[test]
fn test_region_too_small_is_passthrough() {
    let service = ConversionService::new(ramp);
    let source = RasterBuffer::from_fn(6, 6, PixelFormat::Rgb, |x, y| [(x * 40) as u8, (y * 40) as u8, 0]);
    let request =
        ConversionRequest::new(Mode::AsciiArt, params(4)).with_target(Rect::new(1, 1, 3, 5));
    let out = service.convert(&request, Some(&source)).unwrap();
    assert_eq!(out, source);
}

// ==================== Errors and Caching ====================

#[test]
fn test_missing_source_image() {
    let service = ConversionService::new(ramp);
    let request = ConversionRequest::new(Mode::AsciiArt, params(4));
    let err = service.convert(&request, None).unwrap_err();
    assert!(matches!(err, MosaicError::InvalidRequest(_)));
}

#[test]
fn test_identical_glyphs_are_degenerate() {
    let flat = |_: char, p: &RenderParams| -> Result<RasterBuffer, RenderError> {
        Ok(RasterBuffer::filled(p.glyph_width, p.glyph_height, PixelFormat::Gray, 128))
    };
    let service = ConversionService::new(flat);
    let source = RasterBuffer::new(4, 4, PixelFormat::Rgb);
    let request = ConversionRequest::new(Mode::AsciiArt, params(2)).with_subset("ab");
    let err = service.convert(&request, Some(&source)).unwrap_err();
    assert!(matches!(err, MosaicError::DegenerateIntensityRange { intensity: 128 }));
    assert!(service.cache().is_empty());
}

#[test]
fn test_services_share_a_cache() {
    let cache = Arc::new(HolderCache::new());
    let first = ConversionService::with_cache(ramp, Arc::clone(&cache));
    let second = ConversionService::with_cache(ramp, Arc::clone(&cache));
    let source = RasterBuffer::filled(4, 4, PixelFormat::Rgb, 30);
    let request = ConversionRequest::new(Mode::AsciiArt, params(2));

    first.convert(&request, Some(&source)).unwrap();
    second.convert(&request, Some(&source)).unwrap();
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(!second.cache().contains(&params(2), None));
}

// ==================== Files ====================

#[test]
fn test_grayscale_is_idempotent() {
    let source = RasterBuffer::from_fn(7, 5, PixelFormat::Rgb, |x, y| {
        [(x * 30) as u8, (y * 50) as u8, ((x + y) * 10) as u8]
    });
    let once = to_grayscale(&source);
    assert_eq!(to_grayscale(&once), once);
}

#[test]
fn test_file_round_trip_through_service() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.png");
    let output = dir.path().join("output.bmp");

    save_image(&RasterBuffer::filled(8, 8, PixelFormat::Rgb, 0), &input).unwrap();
    let service = ConversionService::new(ramp);
    let request = ConversionRequest::new(Mode::AsciiArt, params(4)).with_subset(STANDARD_SUBSET);
    let source = load_image(&input).unwrap();
    let out = service.convert(&request, Some(&source)).unwrap();
    save_image(&out, &output).unwrap();

    let reloaded = load_image(&output).unwrap();
    assert_eq!(reloaded.dimensions(), (8, 8));
    assert_eq!(reloaded.to_rgb(), out);
}
