//! Geographic point and bounds types.

use serde::{Deserialize, Serialize};

use crate::error::{MaskError, MaskResult};

/// A point in map units.
///
/// Serialized as a two-element array `[x, y]`, the same way the map widget
/// declares coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
}

impl GeoPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Squared planar distance to another point.
    #[inline]
    pub fn distance_squared(&self, other: &GeoPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// The rectangular extent a raster covers, in map units.
///
/// Always satisfies `min.x < max.x` and `min.y < max.y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[[f64; 2]; 2]", into = "[[f64; 2]; 2]")]
pub struct GeoBounds {
    min: GeoPoint,
    max: GeoPoint,
}

impl GeoBounds {
    /// Create bounds from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> MaskResult<Self> {
        let min = GeoPoint::new(min_x, min_y);
        let max = GeoPoint::new(max_x, max_y);
        if !min.is_finite() || !max.is_finite() {
            return Err(MaskError::InvalidBounds(format!(
                "non-finite corner in [{}, {}, {}, {}]",
                min_x, min_y, max_x, max_y
            )));
        }
        if min_x >= max_x || min_y >= max_y {
            return Err(MaskError::InvalidBounds(format!(
                "expected min < max, got [{}, {}, {}, {}]",
                min_x, min_y, max_x, max_y
            )));
        }
        if !(max_x - min_x).is_finite() || !(max_y - min_y).is_finite() {
            return Err(MaskError::InvalidBounds(format!(
                "extent of [{}, {}, {}, {}] overflows",
                min_x, min_y, max_x, max_y
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> GeoPoint {
        self.min
    }

    pub fn max(&self) -> GeoPoint {
        self.max
    }

    /// Width of the bounds in map units.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height of the bounds in map units.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

impl TryFrom<[[f64; 2]; 2]> for GeoBounds {
    type Error = MaskError;

    fn try_from([min, max]: [[f64; 2]; 2]) -> Result<Self, Self::Error> {
        Self::new(min[0], min[1], max[0], max[1])
    }
}

impl From<GeoBounds> for [[f64; 2]; 2] {
    fn from(b: GeoBounds) -> Self {
        [b.min.into(), b.max.into()]
    }
}

/// The 100x100 extent anchored at the origin.
impl Default for GeoBounds {
    fn default() -> Self {
        Self {
            min: GeoPoint::new(0.0, 0.0),
            max: GeoPoint::new(100.0, 100.0),
        }
    }
}
