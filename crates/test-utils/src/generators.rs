//! Raster generators for creating synthetic RGBA test data.
//!
//! These generators create predictable, verifiable pixel patterns that can
//! be used across the test suite. All output is row-major RGBA with 4 bytes
//! per pixel and straight alpha.

/// Creates a raster filled with a single colour.
///
/// # Example
///
/// ```
/// use test_utils::solid_raster;
///
/// let pixels = solid_raster(4, 2, [255, 0, 0, 255]);
/// assert_eq!(pixels.len(), 4 * 2 * 4);
/// assert_eq!(&pixels[0..4], &[255, 0, 0, 255]);
/// ```
pub fn solid_raster(width: usize, height: usize, rgba: [u8; 4]) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        pixels.extend_from_slice(&rgba);
    }
    pixels
}

/// Creates a raster whose colour encodes pixel position.
///
/// Red is `x % 256`, green is `y % 256`, blue is `(x + y) % 256` and alpha
/// is a fixed `alpha`. This makes it easy to verify that colour channels
/// survive masking untouched.
pub fn gradient_raster(width: usize, height: usize, alpha: u8) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[
                (x % 256) as u8,
                (y % 256) as u8,
                ((x + y) % 256) as u8,
                alpha,
            ]);
        }
    }
    pixels
}

/// Creates a checkerboard of two colours with square cells of `cell` pixels.
pub fn checkerboard_raster(
    width: usize,
    height: usize,
    cell: usize,
    a: [u8; 4],
    b: [u8; 4],
) -> Vec<u8> {
    let cell = cell.max(1);
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let even = ((x / cell) + (y / cell)) % 2 == 0;
            pixels.extend_from_slice(if even { &a } else { &b });
        }
    }
    pixels
}

/// Creates a raster with deterministic pseudo-random alpha values.
///
/// Colour channels are constant; alpha varies per pixel so tests can check
/// that retained pixels keep their original alpha.
pub fn noisy_alpha_raster(width: usize, height: usize, seed: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let hash = simple_hash(x as u32, y as u32, seed);
            // Keep alpha non-zero so cleared pixels are distinguishable
            let alpha = 1 + (hash % 255) as u8;
            pixels.extend_from_slice(&[200, 100, 50, alpha]);
        }
    }
    pixels
}

/// Alpha channel of pixel (x, y).
pub fn alpha_at(pixels: &[u8], width: usize, x: usize, y: usize) -> u8 {
    pixels[(y * width + x) * 4 + 3]
}

/// Count pixels whose alpha is zero.
pub fn count_transparent(pixels: &[u8]) -> usize {
    pixels.chunks_exact(4).filter(|px| px[3] == 0).count()
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
