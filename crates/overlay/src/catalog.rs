//! Shape definitions selectable by kind.

use mask_common::{GeoPoint, MaskKind, MaskResult, MaskShape, RadiusUnits};
use serde::{Deserialize, Serialize};

/// Rectangle corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleSpec {
    pub min: GeoPoint,
    pub max: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleSpec {
    pub center: GeoPoint,
    pub radius: f64,
    #[serde(default)]
    pub units: RadiusUnits,
}

/// One shape definition per [`MaskKind`].
///
/// Definitions are stored raw and only validated when a shape is built, so a
/// malformed entry fails the selection of that kind and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeCatalog {
    pub rectangle: RectangleSpec,
    pub circle: CircleSpec,
    pub polygon: Vec<GeoPoint>,
    pub multipolygon: Vec<Vec<GeoPoint>>,
}

impl ShapeCatalog {
    /// Build the shape registered for `kind`.
    pub fn build(&self, kind: MaskKind) -> MaskResult<MaskShape> {
        match kind {
            MaskKind::Rectangle => MaskShape::rectangle(self.rectangle.min, self.rectangle.max),
            MaskKind::Circle => {
                MaskShape::circle(self.circle.center, self.circle.radius, self.circle.units)
            }
            MaskKind::Polygon => MaskShape::polygon(self.polygon.clone()),
            MaskKind::MultiPolygon => MaskShape::multi_polygon(self.multipolygon.clone()),
        }
    }
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self {
            rectangle: RectangleSpec {
                min: GeoPoint::new(20.0, 20.0),
                max: GeoPoint::new(70.0, 70.0),
            },
            circle: CircleSpec {
                center: GeoPoint::new(50.0, 50.0),
                radius: 15.0,
                units: RadiusUnits::MapUnits,
            },
            polygon: points(&[
                (30.0, 30.0),
                (20.0, 60.0),
                (40.0, 80.0),
                (70.0, 70.0),
                (80.0, 40.0),
                (60.0, 20.0),
            ]),
            multipolygon: vec![
                points(&[(10.0, 10.0), (30.0, 10.0), (30.0, 30.0), (10.0, 30.0)]),
                points(&[(60.0, 60.0), (80.0, 60.0), (80.0, 80.0), (60.0, 80.0)]),
            ],
        }
    }
}

fn points(coords: &[(f64, f64)]) -> Vec<GeoPoint> {
    coords.iter().copied().map(GeoPoint::from).collect()
}
