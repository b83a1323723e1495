//! Alpha masking of rasters against geographic shapes.
//!
//! Every pixel whose top-left corner maps (through the CRS Simple inverse
//! transform) to a point outside the mask shape gets alpha 0. Colour channels
//! are never touched, so the operation is idempotent but not reversible.
//!
//! Two paths produce byte-identical output:
//! - **Generic**: one `contains` evaluation per pixel. Rows are split across
//!   the rayon pool once the raster reaches `PARALLEL_THRESHOLD` pixels; the
//!   call still returns only after every row is done.
//! - **Rectangle**: inclusion is separable, so the included column and row
//!   spans are found with O(W + H) evaluations and everything outside the
//!   resulting pixel box is cleared.

use std::ops::Range;
use std::time::Instant;

use mask_common::{CoordinateTransform, GeoBounds, GeoPoint, MaskShape, PixelPoint};
use rayon::prelude::*;
use tracing::debug;

use crate::raster::RasterBuffer;

/// Minimum pixels before the generic path goes parallel
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

/// Mask `raster`, which covers `bounds`, to `shape`.
pub fn apply_mask(mut raster: RasterBuffer, bounds: &GeoBounds, shape: &MaskShape) -> RasterBuffer {
    apply_mask_in_place(&mut raster, bounds, shape);
    raster
}

/// Mask `raster` to `shape` without taking ownership.
///
/// Returns the number of pixels that fell outside the shape.
pub fn apply_mask_in_place(raster: &mut RasterBuffer, bounds: &GeoBounds, shape: &MaskShape) -> usize {
    if raster.is_empty() {
        return 0;
    }

    let start = Instant::now();
    let transform = CoordinateTransform::new(*bounds, raster.width(), raster.height());

    let outside = match shape {
        MaskShape::Rectangle { min, max } => mask_rectangle(raster, &transform, min, max),
        _ => mask_per_pixel(raster, &transform, shape),
    };

    debug!(
        kind = %shape.kind(),
        width = raster.width(),
        height = raster.height(),
        outside,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Applied mask"
    );

    outside
}

/// Mask using per-pixel evaluation regardless of shape kind.
pub fn apply_mask_generic(
    mut raster: RasterBuffer,
    bounds: &GeoBounds,
    shape: &MaskShape,
) -> RasterBuffer {
    if !raster.is_empty() {
        let transform = CoordinateTransform::new(*bounds, raster.width(), raster.height());
        mask_per_pixel(&mut raster, &transform, shape);
    }
    raster
}

fn mask_per_pixel(raster: &mut RasterBuffer, transform: &CoordinateTransform, shape: &MaskShape) -> usize {
    let row_bytes = raster.width() * 4;
    let parallel = raster.pixel_count() >= PARALLEL_THRESHOLD;

    let mask_row = |(row, line): (usize, &mut [u8])| -> usize {
        let mut outside = 0;
        for (col, px) in line.chunks_exact_mut(4).enumerate() {
            let geo = transform.inverse(PixelPoint::new(col as f64, row as f64));
            if !shape.contains(&geo) {
                px[3] = 0;
                outside += 1;
            }
        }
        outside
    };

    let pixels = raster.as_bytes_mut();
    if parallel {
        pixels.par_chunks_mut(row_bytes).enumerate().map(mask_row).sum()
    } else {
        pixels.chunks_mut(row_bytes).enumerate().map(mask_row).sum()
    }
}

fn mask_rectangle(
    raster: &mut RasterBuffer,
    transform: &CoordinateTransform,
    min: &GeoPoint,
    max: &GeoPoint,
) -> usize {
    let width = raster.width();
    let height = raster.height();

    // The transform is monotonic per axis, so included columns and rows are contiguous.
    let cols = inclusive_span(width, |col| {
        let x = transform.column_to_x(col);
        x >= min.x && x <= max.x
    });
    let rows = inclusive_span(height, |row| {
        let y = transform.row_to_y(row);
        y >= min.y && y <= max.y
    });

    let row_bytes = width * 4;
    let mut outside = 0;
    for (row, line) in raster.as_bytes_mut().chunks_mut(row_bytes).enumerate() {
        let keep = match (&rows, &cols) {
            (Some(rows), Some(cols)) if rows.contains(&row) => cols.clone(),
            _ => 0..0,
        };
        for (col, px) in line.chunks_exact_mut(4).enumerate() {
            if !keep.contains(&col) {
                px[3] = 0;
                outside += 1;
            }
        }
    }
    outside
}

/// The contiguous range of indices in `0..len` for which `inside` holds.
fn inclusive_span(len: usize, inside: impl Fn(usize) -> bool) -> Option<Range<usize>> {
    let first = (0..len).find(|&i| inside(i))?;
    let last = (first..len).rev().find(|&i| inside(i))?;
    Some(first..last + 1)
}
