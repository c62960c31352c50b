/**
 * Pixel Grid
 *
 * The authoritative in-memory raster. The buffer holds `width * height`
 * RGBA pixels in row-major order; alpha is always opaque.
 *
 * Every coordinate handed to `set_pixel`, `get_pixel` or `chunk_bytes` must
 * already be validated against the grid bounds. Validation lives in the
 * edit session, so out-of-range access here is a programmer error and is
 * caught by debug assertions only.
 */
use thiserror::Error;

use crate::shared::Color;

/// Bytes per stored pixel (RGB + unused alpha)
pub const BYTES_PER_PIXEL: usize = 4;

/// Errors raised when building a grid from external data
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },
    #[error("edit writer is no longer running")]
    WriterClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelGrid {
    /// New grid filled with the background color
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        Self::filled(width, height, Color::BACKGROUND)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidDimensions { width, height });
        }
        let pixel = [color.r(), color.g(), color.b(), u8::MAX];
        let data = pixel.repeat(width as usize * height as usize);
        Ok(Self { width, height, data })
    }

    /// Wrap an existing RGBA buffer, e.g. one restored from a snapshot
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(CanvasError::InvalidBuffer {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `(x, y)` addresses a pixel; the upper bounds are exclusive on both axes
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Overwrite the color channels of one pixel
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.data[i..i + 3].copy_from_slice(&color.0);
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        let i = self.index(x, y);
        Color([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Copy of the whole RGBA buffer
    pub fn snapshot(&self) -> Vec<u8> {
        self.data.clone()
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of one chunk, clipped to the grid, in row-major order.
    ///
    /// Each row is `min(chunk_size, width - chunk_x * chunk_size) * 4` bytes
    /// long and there are `min(chunk_size, height - chunk_y * chunk_size)`
    /// rows.
    pub fn chunk_bytes(&self, chunk_x: u32, chunk_y: u32, chunk_size: u32) -> Vec<u8> {
        let (x0, y0, w, h) = self.chunk_bounds(chunk_x, chunk_y, chunk_size);
        let row_len = w as usize * BYTES_PER_PIXEL;
        let mut bytes = Vec::with_capacity(row_len * h as usize);
        for y in y0..y0 + h {
            let start = self.index(x0, y);
            bytes.extend_from_slice(&self.data[start..start + row_len]);
        }
        bytes
    }

    /// Origin and clipped extent `(x0, y0, width, height)` of a chunk
    pub fn chunk_bounds(&self, chunk_x: u32, chunk_y: u32, chunk_size: u32) -> (u32, u32, u32, u32) {
        let x0 = chunk_x * chunk_size;
        let y0 = chunk_y * chunk_size;
        debug_assert!(x0 < self.width && y0 < self.height, "chunk ({chunk_x}, {chunk_y}) outside grid");
        let w = chunk_size.min(self.width - x0);
        let h = chunk_size.min(self.height - y0);
        (x0, y0, w, h)
    }
}
