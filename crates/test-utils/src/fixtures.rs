//! Common test fixtures for geo-mask tests.
//!
//! This module provides pre-defined geometry that mirrors the reference
//! masking scene: a 100x100 planar map rendered to a 512x512 raster.

/// Common bounds definitions as (min_x, min_y, max_x, max_y).
pub mod bounds {
    /// The reference scene extent.
    pub const UNIT_100: (f64, f64, f64, f64) = (0.0, 0.0, 100.0, 100.0);

    /// Non-square extent with a negative origin.
    pub const OFFSET_WIDE: (f64, f64, f64, f64) = (-50.0, 10.0, 150.0, 60.0);

    /// Invalid bounds (min > max)
    pub const INVALID: (f64, f64, f64, f64) = (10.0, 10.0, 5.0, 5.0);
}

/// Raster sizes used across the suite.
pub mod raster {
    /// Reference raster edge length.
    pub const SIZE_512: usize = 512;

    /// Small raster for exhaustive per-pixel comparisons.
    pub const SIZE_64: usize = 64;
}

/// Reference mask geometry in map units.
pub mod shapes {
    /// Rectangle mask as (min, max).
    pub const RECTANGLE: ((f64, f64), (f64, f64)) = ((20.0, 20.0), (70.0, 70.0));

    /// Circle mask as (center, radius).
    pub const CIRCLE: ((f64, f64), f64) = ((50.0, 50.0), 15.0);

    /// Irregular hexagon, closing vertex repeated.
    pub const POLYGON: [(f64, f64); 7] = [
        (30.0, 30.0),
        (20.0, 60.0),
        (40.0, 80.0),
        (70.0, 70.0),
        (80.0, 40.0),
        (60.0, 20.0),
        (30.0, 30.0),
    ];

    /// Two disjoint squares.
    pub const MULTI_POLYGON: [[(f64, f64); 4]; 2] = [
        [(10.0, 10.0), (30.0, 10.0), (30.0, 30.0), (10.0, 30.0)],
        [(60.0, 60.0), (80.0, 60.0), (80.0, 80.0), (60.0, 80.0)],
    ];

    /// A point inside the first multipolygon square.
    pub const INSIDE_FIRST_SQUARE: (f64, f64) = (20.0, 20.0);

    /// A point inside the second multipolygon square.
    pub const INSIDE_SECOND_SQUARE: (f64, f64) = (70.0, 70.0);

    /// A point between the squares.
    pub const BETWEEN_SQUARES: (f64, f64) = (45.0, 45.0);
}

/// Weighted heatmap samples as (x, y, value).
pub mod heatmap {
    pub const POINTS: [(f64, f64, f64); 6] = [
        (25.0, 25.0, 30.0),
        (75.0, 75.0, 60.0),
        (25.0, 75.0, 40.0),
        (75.0, 25.0, 50.0),
        (175.0, 125.0, 100.0),
        (50.0, 50.0, 45.0),
    ];
}
