//! PNG encoding for masked overlay rasters.
//!
//! Supports two encoding modes:
//! - **Indexed PNG (color type 3)**: used when the raster has ≤256 unique
//!   RGBA values. Masked vector snapshots nearly always qualify.
//! - **RGBA PNG (color type 6)**: fallback for smooth heatmaps.
//!
//! Transparency is preserved in both modes (tRNS for indexed), which is what
//! makes the cleared mask region invisible once the overlay is displayed.

use std::collections::HashMap;
use std::io::Write;

use mask_common::{MaskError, MaskResult};

use crate::raster::RasterBuffer;

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Encode a raster, choosing indexed or RGBA output automatically.
pub fn encode_overlay(raster: &RasterBuffer) -> MaskResult<Vec<u8>> {
    create_png_auto(raster.as_bytes(), raster.width(), raster.height())
}

/// Create a PNG image with automatic format selection.
///
/// # Arguments
/// - `pixels`: RGBA pixel data (4 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn create_png_auto(pixels: &[u8], width: usize, height: usize) -> MaskResult<Vec<u8>> {
    check_len(pixels, width, height, 4)?;
    match extract_palette(pixels) {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png(pixels, width, height),
    }
}

/// Pack RGBA bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_color(px: &[u8]) -> u32 {
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

/// Build a palette and per-pixel indices, or `None` if there are too many colours.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 4]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let packed = pack_color(px);
        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push([px[0], px[1], px[2], px[3]]);
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Create an indexed PNG (color type 3) from palette and indices.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[[u8; 4]],
    indices: &[u8],
) -> MaskResult<Vec<u8>> {
    check_len(indices, width, height, 1)?;
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(MaskError::Encode(format!(
            "palette must hold 1..={} colors, got {}",
            MAX_PALETTE_SIZE,
            palette.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    // bit depth 8, color type 3 = indexed
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    // tRNS only if any entry is not fully opaque
    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(indices, width, height, 1)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Create a PNG image from RGBA pixel data (color type 6).
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> MaskResult<Vec<u8>> {
    check_len(pixels, width, height, 4)?;

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    // bit depth 8, color type 6 = RGBA
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));
    let idat = deflate_scanlines(pixels, width, height, 4)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn check_len(data: &[u8], width: usize, height: usize, bytes_per_pixel: usize) -> MaskResult<()> {
    if width == 0 || height == 0 {
        return Err(MaskError::Encode(format!(
            "cannot encode {}x{} image",
            width, height
        )));
    }
    if u32::try_from(width).is_err() || u32::try_from(height).is_err() {
        return Err(MaskError::Encode(format!(
            "{}x{} exceeds PNG dimension limits",
            width, height
        )));
    }
    if data.len() != width * height * bytes_per_pixel {
        return Err(MaskError::Encode(format!(
            "expected {} bytes for {}x{}, got {}",
            width * height * bytes_per_pixel,
            width,
            height,
            data.len()
        )));
    }
    Ok(())
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&(width as u32).to_be_bytes());
    data.extend_from_slice(&(height as u32).to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    data
}

/// Write a PNG chunk: length, type, data, CRC over type + data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix each scanline with filter byte 0 and zlib-compress.
fn deflate_scanlines(
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> MaskResult<Vec<u8>> {
    let stride = width * bytes_per_pixel;
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for line in data.chunks_exact(stride) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(line);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    let compress_err = |e: std::io::Error| MaskError::Encode(format!("IDAT compression failed: {}", e));
    encoder.write_all(&uncompressed).map_err(compress_err)?;
    encoder.finish().map_err(compress_err)
}
