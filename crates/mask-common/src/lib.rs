//! Common types shared across the geo-mask crates.
//!
//! Everything here operates in a planar "CRS Simple" frame: map units map
//! linearly onto raster pixels, with no spherical projection involved.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod geometry;
pub mod shape;

pub use bbox::{GeoBounds, GeoPoint};
pub use crs::{CoordinateTransform, PixelPoint};
pub use error::{MaskError, MaskResult};
pub use geometry::{PointInRing, RayCasting};
pub use shape::{MaskKind, MaskShape, Polygon, RadiusUnits};
