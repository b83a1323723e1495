//! CRS Simple transform between map units and raster pixels.
//!
//! Map coordinates are normalized against the raster's bounds and scaled
//! linearly to pixel space. The vertical axis is inverted: raster row 0
//! lies on the bounds' maximum-y ("northern") edge.

use crate::bbox::{GeoBounds, GeoPoint};

/// A position in raster space. Row 0 is the top of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Map a geographic point to pixel coordinates.
#[inline]
pub fn forward(geo: GeoPoint, bounds: &GeoBounds, width: usize, height: usize) -> PixelPoint {
    let min = bounds.min();
    let nx = (geo.x - min.x) / bounds.width();
    let ny = (geo.y - min.y) / bounds.height();
    PixelPoint {
        x: nx * width as f64,
        y: (1.0 - ny) * height as f64,
    }
}

/// Map pixel coordinates back to a geographic point. Inverse of [`forward`].
#[inline]
pub fn inverse(pixel: PixelPoint, bounds: &GeoBounds, width: usize, height: usize) -> GeoPoint {
    let min = bounds.min();
    let w = width as f64;
    let h = height as f64;
    GeoPoint {
        x: (pixel.x / w) * bounds.width() + min.x,
        y: ((h - pixel.y) / h) * bounds.height() + min.y,
    }
}

/// A transform bound to one raster's extent and dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    bounds: GeoBounds,
    width: usize,
    height: usize,
}

impl CoordinateTransform {
    pub fn new(bounds: GeoBounds, width: usize, height: usize) -> Self {
        Self {
            bounds,
            width,
            height,
        }
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn forward(&self, geo: GeoPoint) -> PixelPoint {
        forward(geo, &self.bounds, self.width, self.height)
    }

    #[inline]
    pub fn inverse(&self, pixel: PixelPoint) -> GeoPoint {
        inverse(pixel, &self.bounds, self.width, self.height)
    }

    /// Map x of column `col` (its left edge) to map units.
    ///
    /// Same arithmetic as the x component of [`inverse`], so per-column
    /// tables built from it agree with per-pixel evaluation.
    #[inline]
    pub fn column_to_x(&self, col: usize) -> f64 {
        (col as f64 / self.width as f64) * self.bounds.width() + self.bounds.min().x
    }

    /// Map y of row `row` (its top edge) to map units.
    #[inline]
    pub fn row_to_y(&self, row: usize) -> f64 {
        let h = self.height as f64;
        ((h - row as f64) / h) * self.bounds.height() + self.bounds.min().y
    }

    /// The pixel whose top-left corner is nearest to `geo`, if it lies on the raster.
    pub fn pixel_at(&self, geo: GeoPoint) -> Option<(usize, usize)> {
        let p = self.forward(geo);
        let x = p.x.round();
        let y = p.y.round();
        if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
            return None;
        }
        Some((x as usize, y as usize))
    }
}
