//! Raster production and masking for map overlays.
//!
//! - Heatmap rendering from weighted points
//! - Vector snapshot rendering of styled rectangles
//! - Alpha masking against mask shapes
//! - PNG encoding of the result

pub mod gradient;
pub mod heatmap;
pub mod mask;
pub mod png;
pub mod raster;
pub mod vector;

pub use mask::{apply_mask, apply_mask_in_place};
pub use raster::RasterBuffer;
