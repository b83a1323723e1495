//! Point-in-polygon capability.
//!
//! Polygon masks do not hard-code their containment routine; they consume
//! any [`PointInRing`] implementation. [`RayCasting`] is the default.

use crate::bbox::GeoPoint;

/// Containment test for a point against a closed ring of vertices.
///
/// The ring is implicitly closed: the last vertex connects back to the first.
pub trait PointInRing {
    fn contains(&self, ring: &[GeoPoint], point: &GeoPoint) -> bool;
}

/// Even-odd ray casting: count crossings of a horizontal ray from the point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RayCasting;

impl PointInRing for RayCasting {
    fn contains(&self, ring: &[GeoPoint], point: &GeoPoint) -> bool {
        let n = ring.len();
        if n < 3 {
            return false;
        }

        let (x, y) = (point.x, point.y);
        let mut inside = false;
        let mut j = n - 1;

        for i in 0..n {
            let (xi, yi) = (ring[i].x, ring[i].y);
            let (xj, yj) = (ring[j].x, ring[j].y);

            let crosses = ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi);
            if crosses {
                inside = !inside;
            }
            j = i;
        }

        inside
    }
}

/// Axis-aligned extent of a set of points as `(min, max)`.
///
/// Returns `None` for an empty slice.
pub fn extent(points: &[GeoPoint]) -> Option<(GeoPoint, GeoPoint)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(10.0, 0.0),
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_ray_casting_square() {
        let ring = square();
        assert!(RayCasting.contains(&ring, &GeoPoint::new(5.0, 5.0)));
        assert!(!RayCasting.contains(&ring, &GeoPoint::new(15.0, 5.0)));
        assert!(!RayCasting.contains(&ring, &GeoPoint::new(5.0, -0.5)));
    }

    #[test]
    fn test_ray_casting_concave() {
        // U shape opening upwards
        let ring = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(30.0, 0.0),
            GeoPoint::new(30.0, 30.0),
            GeoPoint::new(20.0, 30.0),
            GeoPoint::new(20.0, 10.0),
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(10.0, 30.0),
            GeoPoint::new(0.0, 30.0),
        ];
        assert!(RayCasting.contains(&ring, &GeoPoint::new(5.0, 20.0)));
        assert!(RayCasting.contains(&ring, &GeoPoint::new(25.0, 20.0)));
        assert!(!RayCasting.contains(&ring, &GeoPoint::new(15.0, 20.0)));
        assert!(RayCasting.contains(&ring, &GeoPoint::new(15.0, 5.0)));
    }

    #[test]
    fn test_degenerate_ring() {
        let ring = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(10.0, 10.0)];
        assert!(!RayCasting.contains(&ring, &GeoPoint::new(5.0, 5.0)));
        assert!(!RayCasting.contains(&[], &GeoPoint::new(0.0, 0.0)));
    }

    #[test]
    fn test_extent() {
        let (min, max) = extent(&square()).unwrap();
        assert_eq!(min, GeoPoint::new(0.0, 0.0));
        assert_eq!(max, GeoPoint::new(10.0, 10.0));
        assert!(extent(&[]).is_none());
    }
}
