//! Mask shapes and their containment tests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bbox::GeoPoint;
use crate::error::{MaskError, MaskResult};
use crate::geometry::{extent, PointInRing, RayCasting};

/// Tag identifying which kind of shape a mask uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskKind {
    Rectangle,
    Circle,
    Polygon,
    #[serde(alias = "multi")]
    MultiPolygon,
}

impl MaskKind {
    /// All kinds, in selector-key order (`1`..`4`).
    pub const ALL: [MaskKind; 4] = [
        MaskKind::Rectangle,
        MaskKind::Circle,
        MaskKind::Polygon,
        MaskKind::MultiPolygon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaskKind::Rectangle => "rectangle",
            MaskKind::Circle => "circle",
            MaskKind::Polygon => "polygon",
            MaskKind::MultiPolygon => "multipolygon",
        }
    }
}

impl FromStr for MaskKind {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rectangle" | "rect" => Ok(MaskKind::Rectangle),
            "circle" => Ok(MaskKind::Circle),
            "polygon" => Ok(MaskKind::Polygon),
            "multi" | "multipolygon" | "multi-polygon" => Ok(MaskKind::MultiPolygon),
            _ => Err(MaskError::UnknownMaskKind(s.to_string())),
        }
    }
}

impl fmt::Display for MaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Units a circle radius was declared in.
///
/// All containment is evaluated in map units. A radius given in meters is
/// scaled by a fixed `meters_per_unit` at construction; there is no
/// geodesic conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum RadiusUnits {
    MapUnits,
    Meters { meters_per_unit: f64 },
}

impl Default for RadiusUnits {
    fn default() -> Self {
        RadiusUnits::MapUnits
    }
}

impl RadiusUnits {
    fn to_map_units(self, radius: f64) -> MaskResult<f64> {
        match self {
            RadiusUnits::MapUnits => Ok(radius),
            RadiusUnits::Meters { meters_per_unit } => {
                if !meters_per_unit.is_finite() || meters_per_unit <= 0.0 {
                    return Err(MaskError::InvalidGeometry(format!(
                        "meters_per_unit must be positive, got {}",
                        meters_per_unit
                    )));
                }
                Ok(radius / meters_per_unit)
            }
        }
    }
}

/// A simple closed ring.
///
/// Rings with fewer than three vertices are kept as-is and contain nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    ring: Vec<GeoPoint>,
    extent: Option<(GeoPoint, GeoPoint)>,
}

impl Polygon {
    /// Build a polygon from its vertices. A repeated closing vertex is dropped.
    pub fn new(mut ring: Vec<GeoPoint>) -> MaskResult<Self> {
        if let Some(bad) = ring.iter().find(|p| !p.is_finite()) {
            return Err(MaskError::InvalidGeometry(format!(
                "non-finite polygon vertex ({}, {})",
                bad.x, bad.y
            )));
        }
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        let extent = extent(&ring);
        Ok(Self { ring, extent })
    }

    pub fn ring(&self) -> &[GeoPoint] {
        &self.ring
    }

    pub fn is_degenerate(&self) -> bool {
        self.ring.len() < 3
    }

    pub fn extent(&self) -> Option<(GeoPoint, GeoPoint)> {
        self.extent
    }

    pub fn contains(&self, p: &GeoPoint) -> bool {
        self.contains_with(&RayCasting, p)
    }

    /// Containment using a caller-supplied point-in-ring routine.
    ///
    /// Points outside the ring's extent are rejected before the routine runs.
    pub fn contains_with<R: PointInRing + ?Sized>(&self, routine: &R, p: &GeoPoint) -> bool {
        if self.is_degenerate() {
            return false;
        }
        match self.extent {
            Some((min, max)) if p.x < min.x || p.x > max.x || p.y < min.y || p.y > max.y => false,
            _ => routine.contains(&self.ring, p),
        }
    }
}

/// A region a raster is clipped to.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskShape {
    /// Axis-aligned extent; all four edges are inside.
    Rectangle { min: GeoPoint, max: GeoPoint },
    /// Planar disc. `radius` is in map units; `units` records how it was declared.
    Circle {
        center: GeoPoint,
        radius: f64,
        units: RadiusUnits,
    },
    Polygon(Polygon),
    /// Union of member polygons.
    MultiPolygon { polygons: Vec<Polygon> },
}

impl MaskShape {
    pub fn rectangle(min: GeoPoint, max: GeoPoint) -> MaskResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(MaskError::InvalidGeometry(
                "non-finite rectangle corner".to_string(),
            ));
        }
        if min.x > max.x || min.y > max.y {
            return Err(MaskError::InvalidGeometry(format!(
                "rectangle min ({}, {}) exceeds max ({}, {})",
                min.x, min.y, max.x, max.y
            )));
        }
        Ok(MaskShape::Rectangle { min, max })
    }

    pub fn circle(center: GeoPoint, radius: f64, units: RadiusUnits) -> MaskResult<Self> {
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            return Err(MaskError::InvalidGeometry(format!(
                "invalid circle at ({}, {}) with radius {}",
                center.x, center.y, radius
            )));
        }
        let radius = units.to_map_units(radius)?;
        Ok(MaskShape::Circle {
            center,
            radius,
            units,
        })
    }

    pub fn polygon(ring: Vec<GeoPoint>) -> MaskResult<Self> {
        Ok(MaskShape::Polygon(Polygon::new(ring)?))
    }

    pub fn multi_polygon(rings: Vec<Vec<GeoPoint>>) -> MaskResult<Self> {
        if rings.is_empty() {
            return Err(MaskError::InvalidGeometry(
                "multipolygon needs at least one polygon".to_string(),
            ));
        }
        let polygons = rings
            .into_iter()
            .map(Polygon::new)
            .collect::<MaskResult<Vec<_>>>()?;
        Ok(MaskShape::MultiPolygon { polygons })
    }

    pub fn kind(&self) -> MaskKind {
        match self {
            MaskShape::Rectangle { .. } => MaskKind::Rectangle,
            MaskShape::Circle { .. } => MaskKind::Circle,
            MaskShape::Polygon(_) => MaskKind::Polygon,
            MaskShape::MultiPolygon { .. } => MaskKind::MultiPolygon,
        }
    }

    /// Whether `p` lies inside the shape.
    #[inline]
    pub fn contains(&self, p: &GeoPoint) -> bool {
        self.contains_with(&RayCasting, p)
    }

    /// Same as [`contains`](Self::contains) with an explicit point-in-ring routine
    /// for the polygon kinds.
    pub fn contains_with<R: PointInRing + ?Sized>(&self, routine: &R, p: &GeoPoint) -> bool {
        match self {
            MaskShape::Rectangle { min, max } => {
                p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
            }
            MaskShape::Circle { center, radius, .. } => {
                p.distance_squared(center) <= radius * radius
            }
            MaskShape::Polygon(polygon) => polygon.contains_with(routine, p),
            MaskShape::MultiPolygon { polygons } => {
                polygons.iter().any(|polygon| polygon.contains_with(routine, p))
            }
        }
    }

    /// Axis-aligned extent of the shape, `None` if it contains no points.
    pub fn extent(&self) -> Option<(GeoPoint, GeoPoint)> {
        match self {
            MaskShape::Rectangle { min, max } => Some((*min, *max)),
            MaskShape::Circle { center, radius, .. } => Some((
                GeoPoint::new(center.x - radius, center.y - radius),
                GeoPoint::new(center.x + radius, center.y + radius),
            )),
            MaskShape::Polygon(polygon) if !polygon.is_degenerate() => polygon.extent(),
            MaskShape::Polygon(_) => None,
            MaskShape::MultiPolygon { polygons } => polygons
                .iter()
                .filter(|polygon| !polygon.is_degenerate())
                .filter_map(Polygon::extent)
                .reduce(|(amin, amax), (bmin, bmax)| {
                    (
                        GeoPoint::new(amin.x.min(bmin.x), amin.y.min(bmin.y)),
                        GeoPoint::new(amax.x.max(bmax.x), amax.y.max(bmax.y)),
                    )
                }),
        }
    }
}
