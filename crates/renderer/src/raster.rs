//! RGBA raster buffers.

use mask_common::{MaskError, MaskResult};

/// A row-major RGBA image, 4 bytes per pixel, straight (non-premultiplied) alpha.
///
/// The byte length always equals `width * height * 4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Wrap existing RGBA bytes, checking the length against the dimensions.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> MaskResult<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| MaskError::InvalidRaster(format!("{}x{} overflows", width, height)))?;
        if pixels.len() != expected {
            return Err(MaskError::InvalidRaster(format!(
                "{}x{} raster needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A fully transparent raster.
    pub fn transparent(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width * height * 4],
        }
    }

    /// A raster filled with one colour.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) * 4)
    }

    /// RGBA of pixel (x, y), `None` when out of range.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    pub fn alpha(&self, x: usize, y: usize) -> Option<u8> {
        self.offset(x, y).map(|i| self.pixels[i + 3])
    }

    /// Overwrite pixel (x, y). Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&rgba);
        }
    }

    /// Number of pixels with alpha 0.
    pub fn transparent_count(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] == 0).count()
    }
}
