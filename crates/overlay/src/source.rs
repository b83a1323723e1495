//! Raw layers an overlay frame is captured from.

use mask_common::{CoordinateTransform, MaskResult};
use renderer::heatmap::{render_heatmap, HeatPoint, HeatmapOptions};
use renderer::vector::{render_rectangles, StyledRectangle};
use renderer::RasterBuffer;

use crate::config::{HeatmapSourceConfig, SourceConfig, VectorSourceConfig};

/// Edge length of placeholder checkerboard cells, in pixels.
const PLACEHOLDER_CELL: usize = 16;

/// Produces the current frame of the raw layers as an RGBA raster.
pub trait RasterSource {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Render the layers over `transform`'s bounds at its raster size.
    fn capture_frame(&self, transform: &CoordinateTransform) -> MaskResult<RasterBuffer>;
}

impl<T: RasterSource + ?Sized> RasterSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn capture_frame(&self, transform: &CoordinateTransform) -> MaskResult<RasterBuffer> {
        (**self).capture_frame(transform)
    }
}

/// Build the source described by configuration.
pub fn from_config(config: &SourceConfig) -> MaskResult<Box<dyn RasterSource>> {
    Ok(match config {
        SourceConfig::Heatmap(heatmap) => Box::new(HeatmapSource::from_config(heatmap)?),
        SourceConfig::Vector(vector) => Box::new(VectorSource::from_config(vector)),
    })
}

/// Inverse-distance-weighted heatmap of sample points.
#[derive(Debug, Clone)]
pub struct HeatmapSource {
    points: Vec<HeatPoint>,
    options: HeatmapOptions,
}

impl HeatmapSource {
    pub fn new(points: Vec<HeatPoint>, options: HeatmapOptions) -> Self {
        Self { points, options }
    }

    pub fn from_config(config: &HeatmapSourceConfig) -> MaskResult<Self> {
        Ok(Self::new(config.points.clone(), config.options()?))
    }
}

impl RasterSource for HeatmapSource {
    fn name(&self) -> &str {
        "heatmap"
    }

    fn capture_frame(&self, transform: &CoordinateTransform) -> MaskResult<RasterBuffer> {
        render_heatmap(&self.points, transform, &self.options)
    }
}

/// Drawn rectangles, snapshotted in order.
#[derive(Debug, Clone)]
pub struct VectorSource {
    rectangles: Vec<StyledRectangle>,
}

impl VectorSource {
    pub fn new(rectangles: Vec<StyledRectangle>) -> Self {
        Self { rectangles }
    }

    pub fn from_config(config: &VectorSourceConfig) -> Self {
        Self::new(config.rectangles.clone())
    }
}

impl RasterSource for VectorSource {
    fn name(&self) -> &str {
        "vector"
    }

    fn capture_frame(&self, transform: &CoordinateTransform) -> MaskResult<RasterBuffer> {
        render_rectangles(&self.rectangles, transform)
    }
}

/// Opaque grey checkerboard used when a frame cannot be captured.
pub fn placeholder_raster(width: usize, height: usize) -> RasterBuffer {
    const LIGHT: [u8; 4] = [204, 204, 204, 255];
    const DARK: [u8; 4] = [153, 153, 153, 255];

    let mut raster = RasterBuffer::transparent(width, height);
    for y in 0..height {
        for x in 0..width {
            let even = (x / PLACEHOLDER_CELL + y / PLACEHOLDER_CELL) % 2 == 0;
            raster.set_pixel(x, y, if even { LIGHT } else { DARK });
        }
    }
    raster
}

#[cfg(test)]
mod tests {
    use super::*;
    use mask_common::GeoBounds;

    #[test]
    fn test_placeholder_is_deterministic_and_opaque() {
        let a = placeholder_raster(40, 20);
        assert_eq!(a, placeholder_raster(40, 20));
        assert_eq!(a.transparent_count(), 0);
        assert_ne!(a.pixel(0, 0), a.pixel(16, 0));
        assert_eq!(a.pixel(0, 0), a.pixel(16, 16));
    }

    #[test]
    fn test_sources_from_default_config() {
        let t = CoordinateTransform::new(GeoBounds::default(), 32, 32);
        for config in [
            SourceConfig::default(),
            SourceConfig::Vector(VectorSourceConfig::default()),
        ] {
            let source = from_config(&config).unwrap();
            let frame = source.capture_frame(&t).unwrap();
            assert_eq!((frame.width(), frame.height()), (32, 32));
        }
    }
}
