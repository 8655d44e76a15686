//! Strided pixel storage with bounds-checked accessors.

use super::Rect;
use crate::error::RasterError;

/// An RGB triple.
pub type Rgb = [u8; 3];

pub const WHITE: Rgb = [255, 255, 255];

/// Pixel layout of a [`RasterBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One intensity sample per pixel.
    Gray,
    /// Red, green, blue samples per pixel.
    Rgb,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
        }
    }

    pub fn from_channels(channels: u8) -> Result<Self, RasterError> {
        match channels {
            1 => Ok(PixelFormat::Gray),
            3 => Ok(PixelFormat::Rgb),
            n => Err(RasterError::UnsupportedChannels(n)),
        }
    }
}

/// A `width` x `height` grid of 8-bit samples.
///
/// Rows are `stride` bytes apart; a row may carry padding past
/// `width * channels`. Every accessor is checked against the buffer
/// dimensions and never reads padding.
///
/// Equality compares dimensions, format and visible samples; stride and
/// padding bytes are ignored.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    stride: usize,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Create a black buffer with tightly packed rows.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self::filled(width, height, format, 0)
    }

    /// Create a buffer with every sample set to `value`.
    pub fn filled(width: u32, height: u32, format: PixelFormat, value: u8) -> Self {
        let stride = width as usize * format.channels();
        Self {
            width,
            height,
            format,
            stride,
            data: vec![value; stride * height as usize],
        }
    }

    /// Create a buffer whose pixels are produced by `f(x, y)`.
    ///
    /// Gray buffers keep the first component of the returned triple.
    pub fn from_fn<F>(width: u32, height: u32, format: PixelFormat, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Rgb,
    {
        let mut buffer = Self::new(width, height, format);
        let channels = format.channels();
        for y in 0..height {
            for x in 0..width {
                let offset = buffer.offset(x, y);
                let rgb = f(x, y);
                buffer.data[offset..offset + channels].copy_from_slice(&rgb[..channels]);
            }
        }
        buffer
    }

    /// Wrap existing sample storage.
    ///
    /// # Errors
    /// Fails when `stride` cannot hold a row or `data` is shorter than
    /// `stride * height`.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        let row_len = width as usize * format.channels();
        if stride < row_len {
            return Err(RasterError::StrideTooSmall { stride, row_len });
        }
        let expected = stride * height as usize;
        if data.len() < expected {
            return Err(RasterError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        let mut data = data;
        data.truncate(expected);
        Ok(Self {
            width,
            height,
            format,
            stride,
            data,
        })
    }

    /// Wrap tightly packed rows of `channels` interleaved samples.
    ///
    /// # Errors
    /// `UnsupportedChannels` for anything but 1 (gray) or 3 (RGB).
    pub fn from_samples(
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        Self::from_packed(width, height, PixelFormat::from_channels(channels)?, data)
    }

    /// Wrap tightly packed rows.
    pub fn from_packed(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        Self::from_raw(width, height, format, width as usize * format.channels(), data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Byte length of the visible part of a row.
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride + x as usize * self.channels()
    }

    fn check(&self, x: u32, y: u32) -> Result<(), RasterError> {
        if x < self.width && y < self.height {
            Ok(())
        } else {
            Err(RasterError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn check_rect(&self, rect: Rect) -> Result<(), RasterError> {
        if rect.fits_within(self.width, self.height) {
            Ok(())
        } else {
            Err(RasterError::RectOutOfBounds {
                rect,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Samples of one pixel (1 or 3 bytes).
    pub fn pixel(&self, x: u32, y: u32) -> Result<&[u8], RasterError> {
        self.check(x, y)?;
        let offset = self.offset(x, y);
        Ok(&self.data[offset..offset + self.channels()])
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Result<&mut [u8], RasterError> {
        self.check(x, y)?;
        let offset = self.offset(x, y);
        let channels = self.channels();
        Ok(&mut self.data[offset..offset + channels])
    }

    /// First-channel intensity of a pixel.
    pub fn sample(&self, x: u32, y: u32) -> Result<u8, RasterError> {
        self.check(x, y)?;
        Ok(self.data[self.offset(x, y)])
    }

    /// Pixel as RGB; gray samples are replicated.
    pub fn rgb(&self, x: u32, y: u32) -> Result<Rgb, RasterError> {
        let px = self.pixel(x, y)?;
        Ok(match self.format {
            PixelFormat::Gray => [px[0]; 3],
            PixelFormat::Rgb => [px[0], px[1], px[2]],
        })
    }

    /// Write an RGB pixel; gray buffers store the channel average.
    pub fn set_rgb(&mut self, x: u32, y: u32, rgb: Rgb) -> Result<(), RasterError> {
        let format = self.format;
        let px = self.pixel_mut(x, y)?;
        match format {
            PixelFormat::Gray => px[0] = average_rgb(rgb),
            PixelFormat::Rgb => px.copy_from_slice(&rgb),
        }
        Ok(())
    }

    /// Visible samples of row `y`, without stride padding.
    pub fn row(&self, y: u32) -> Result<&[u8], RasterError> {
        if y >= self.height {
            return Err(RasterError::OutOfBounds {
                x: 0,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let start = y as usize * self.stride;
        Ok(&self.data[start..start + self.row_len()])
    }

    /// Iterate over visible rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let row_len = self.row_len();
        self.data
            .chunks(self.stride.max(1))
            .take(self.height as usize)
            .map(move |row| &row[..row_len])
    }

    /// Raw storage rows including padding, for row-parallel writers.
    pub(crate) fn strided_rows_mut(&mut self) -> std::slice::ChunksMut<'_, u8> {
        let stride = self.stride.max(1);
        self.data.chunks_mut(stride)
    }

    /// Raw storage and its stride, for handing rows to rayon.
    pub(crate) fn storage_mut(&mut self) -> (&mut [u8], usize) {
        (&mut self.data, self.stride.max(1))
    }

    /// Read-only window onto a sub-rectangle.
    pub fn view(&self, rect: Rect) -> Result<RasterView<'_>, RasterError> {
        self.check_rect(rect)?;
        Ok(RasterView { buffer: self, rect })
    }

    /// Copy a sub-rectangle into a new, packed buffer of the same format.
    pub fn crop(&self, rect: Rect) -> Result<RasterBuffer, RasterError> {
        Ok(self.view(rect)?.to_buffer())
    }

    /// Copy `src` into this buffer with its top-left corner at (`x`, `y`).
    ///
    /// Pixel formats are converted as needed.
    pub fn blit(&mut self, src: &RasterBuffer, x: u32, y: u32) -> Result<(), RasterError> {
        let target = Rect::new(x, y, src.width, src.height);
        self.check_rect(target)?;
        for sy in 0..src.height {
            for sx in 0..src.width {
                let rgb = src.rgb(sx, sy)?;
                self.set_rgb(x + sx, y + sy, rgb)?;
            }
        }
        Ok(())
    }

    /// Three-channel copy of this buffer.
    pub fn to_rgb(&self) -> RasterBuffer {
        match self.format {
            PixelFormat::Rgb => self.clone(),
            PixelFormat::Gray => {
                let mut out = RasterBuffer::new(self.width, self.height, PixelFormat::Rgb);
                for (dst, src) in out.strided_rows_mut().zip(self.rows()) {
                    for (px, &v) in dst.chunks_exact_mut(3).zip(src) {
                        px.fill(v);
                    }
                }
                out
            }
        }
    }

    /// Visible samples packed row after row, without padding.
    pub fn to_packed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.row_len() * self.height as usize);
        for row in self.rows() {
            out.extend_from_slice(row);
        }
        out
    }
}

impl PartialEq for RasterBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions()
            && self.format == other.format
            && self.rows().eq(other.rows())
    }
}

impl Eq for RasterBuffer {}

/// Borrowed sub-rectangle of a [`RasterBuffer`], addressed in local coordinates.
#[derive(Debug, Clone, Copy)]
pub struct RasterView<'a> {
    buffer: &'a RasterBuffer,
    rect: Rect,
}

impl<'a> RasterView<'a> {
    pub fn width(&self) -> u32 {
        self.rect.width
    }

    pub fn height(&self) -> u32 {
        self.rect.height
    }

    /// Position of the view inside its parent.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    fn check(&self, x: u32, y: u32) -> Result<(), RasterError> {
        if x < self.rect.width && y < self.rect.height {
            Ok(())
        } else {
            Err(RasterError::OutOfBounds {
                x,
                y,
                width: self.rect.width,
                height: self.rect.height,
            })
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Result<&'a [u8], RasterError> {
        self.check(x, y)?;
        self.buffer.pixel(self.rect.x + x, self.rect.y + y)
    }

    pub fn sample(&self, x: u32, y: u32) -> Result<u8, RasterError> {
        self.check(x, y)?;
        self.buffer.sample(self.rect.x + x, self.rect.y + y)
    }

    pub fn rgb(&self, x: u32, y: u32) -> Result<Rgb, RasterError> {
        self.check(x, y)?;
        self.buffer.rgb(self.rect.x + x, self.rect.y + y)
    }

    /// Visible samples of local row `y`.
    pub fn row(&self, y: u32) -> Result<&'a [u8], RasterError> {
        if y >= self.rect.height {
            return Err(RasterError::OutOfBounds {
                x: 0,
                y,
                width: self.rect.width,
                height: self.rect.height,
            });
        }
        Ok(self.visible_row(y))
    }

    /// Local row `y`, which must be inside the view.
    fn visible_row(&self, y: u32) -> &'a [u8] {
        debug_assert!(y < self.rect.height, "row {y} outside view {}", self.rect);
        let channels = self.buffer.channels();
        let start = (self.rect.y + y) as usize * self.buffer.stride + self.rect.x as usize * channels;
        &self.buffer.data[start..start + self.rect.width as usize * channels]
    }

    /// Iterate over the view's rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let view = *self;
        (0..self.rect.height).map(move |y| view.visible_row(y))
    }

    /// Sum of each channel over the view, with the pixel count.
    ///
    /// Gray views report the same sum in all three slots.
    pub fn channel_sums(&self) -> ([u64; 3], u64) {
        let mut sums = [0u64; 3];
        let channels = self.buffer.channels();
        for row in self.rows() {
            for px in row.chunks_exact(channels) {
                match self.buffer.format {
                    PixelFormat::Gray => {
                        let v = px[0] as u64;
                        sums[0] += v;
                        sums[1] += v;
                        sums[2] += v;
                    }
                    PixelFormat::Rgb => {
                        sums[0] += px[0] as u64;
                        sums[1] += px[1] as u64;
                        sums[2] += px[2] as u64;
                    }
                }
            }
        }
        (sums, self.rect.area())
    }

    /// Per-channel mean color, or black for an empty view.
    pub fn average_rgb(&self) -> Rgb {
        let (sums, count) = self.channel_sums();
        if count == 0 {
            return [0, 0, 0];
        }
        [
            (sums[0] / count) as u8,
            (sums[1] / count) as u8,
            (sums[2] / count) as u8,
        ]
    }

    /// Copy the view into a new packed buffer.
    pub fn to_buffer(&self) -> RasterBuffer {
        let format = self.buffer.format;
        let row_len = self.rect.width as usize * format.channels();
        let mut data = Vec::with_capacity(row_len * self.rect.height as usize);
        for row in self.rows() {
            data.extend_from_slice(row);
        }
        RasterBuffer {
            width: self.rect.width,
            height: self.rect.height,
            format,
            stride: row_len,
            data,
        }
    }
}

/// Integer mean of the three channels.
#[inline]
pub fn average_rgb(rgb: Rgb) -> u8 {
    ((rgb[0] as u16 + rgb[1] as u16 + rgb[2] as u16) / 3) as u8
}
