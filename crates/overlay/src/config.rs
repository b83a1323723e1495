//! Viewer configuration loaded from YAML.
//!
//! Every section is optional; missing sections fall back to the reference
//! scene (a 100x100 map rendered at 512x512 with a circle mask).

use std::path::Path;

use mask_common::{CoordinateTransform, GeoBounds, MaskError, MaskKind, MaskResult};
use renderer::gradient::{default_stops, ColorStop, Gradient};
use renderer::heatmap::{HeatPoint, HeatmapOptions};
use renderer::vector::{RectangleStyle, StyledRectangle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::ShapeCatalog;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Map extent the raster and overlay cover.
    pub bounds: GeoBounds,
    pub raster: RasterSize,
    pub overlay: OverlayOptions,
    /// Mask kind selected at startup.
    pub default_kind: MaskKind,
    pub shapes: ShapeCatalog,
    pub source: SourceConfig,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            bounds: GeoBounds::default(),
            raster: RasterSize::default(),
            overlay: OverlayOptions::default(),
            default_kind: MaskKind::Circle,
            shapes: ShapeCatalog::default(),
            source: SourceConfig::default(),
        }
    }
}

impl MaskConfig {
    /// Load and validate a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> MaskResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MaskError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml_str(&contents)?;
        info!(
            path = %path.display(),
            default_kind = %config.default_kind,
            width = config.raster.width,
            height = config.raster.height,
            "Loaded mask configuration"
        );
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> MaskResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| MaskError::Config(format!("invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot express.
    ///
    /// Only the default kind's shape must build; other catalog entries are
    /// checked when they are selected.
    pub fn validate(&self) -> MaskResult<()> {
        if self.raster.width == 0 || self.raster.height == 0 {
            return Err(MaskError::Config(format!(
                "raster size must be non-zero, got {}x{}",
                self.raster.width, self.raster.height
            )));
        }
        if !(0.0..=1.0).contains(&self.overlay.opacity) {
            return Err(MaskError::Config(format!(
                "overlay opacity {} outside 0..1",
                self.overlay.opacity
            )));
        }
        self.shapes.build(self.default_kind)?;
        Ok(())
    }

    /// Transform between the configured bounds and raster.
    pub fn transform(&self) -> CoordinateTransform {
        CoordinateTransform::new(self.bounds, self.raster.width, self.raster.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterSize {
    pub width: usize,
    pub height: usize,
}

impl Default for RasterSize {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

/// Presentation options for published overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    pub opacity: f32,
    pub interactive: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            interactive: false,
        }
    }
}

/// Which raw layer the overlay is captured from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Heatmap(HeatmapSourceConfig),
    Vector(VectorSourceConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Heatmap(HeatmapSourceConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapSourceConfig {
    pub points: Vec<HeatPoint>,
    #[serde(default = "default_stops")]
    pub gradient: Vec<ColorStop>,
    #[serde(default = "default_power")]
    pub power: f64,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
}

fn default_power() -> f64 {
    2.0
}

impl HeatmapSourceConfig {
    pub fn options(&self) -> MaskResult<HeatmapOptions> {
        Ok(HeatmapOptions {
            power: self.power,
            min_value: self.min_value,
            max_value: self.max_value,
            gradient: Gradient::from_stops(&self.gradient)?,
            ..HeatmapOptions::default()
        })
    }
}

impl Default for HeatmapSourceConfig {
    fn default() -> Self {
        let points = [
            [25.0, 25.0, 30.0],
            [75.0, 75.0, 60.0],
            [25.0, 75.0, 40.0],
            [75.0, 25.0, 50.0],
            [175.0, 125.0, 100.0],
            [50.0, 50.0, 45.0],
        ];
        Self {
            points: points.into_iter().map(HeatPoint::from).collect(),
            gradient: default_stops(),
            power: default_power(),
            min_value: None,
            max_value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorSourceConfig {
    pub rectangles: Vec<StyledRectangle>,
}

impl Default for VectorSourceConfig {
    fn default() -> Self {
        let rect = |min: [f64; 2], max: [f64; 2], color: &str, fill_opacity: f32, weight: f32| {
            StyledRectangle {
                min: min.into(),
                max: max.into(),
                style: RectangleStyle {
                    color: color.to_string(),
                    fill_color: color.to_string(),
                    fill_opacity,
                    weight,
                },
            }
        };
        Self {
            rectangles: vec![
                rect([10.0, 10.0], [30.0, 40.0], "red", 0.5, 2.0),
                rect([50.0, 50.0], [80.0, 80.0], "blue", 0.7, 3.0),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_reference_scene() {
        let config = MaskConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, MaskConfig::default());
        assert_eq!(config.default_kind, MaskKind::Circle);
        assert_eq!(config.overlay.opacity, 1.0);
        assert!(!config.overlay.interactive);
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let config = MaskConfig::from_yaml_str(
            r##"
bounds: [[-50, 10], [150, 60]]
raster: { width: 200, height: 50 }
default_kind: multi
source:
  type: vector
  rectangles:
    - { min: [0, 20], max: [10, 30], color: "#00ff00", fill_color: lime }
"##,
        )
        .unwrap();
        assert_eq!(config.bounds.width(), 200.0);
        assert_eq!(config.default_kind, MaskKind::MultiPolygon);
        assert!(matches!(config.source, SourceConfig::Vector(ref v) if v.rectangles.len() == 1));
        assert_eq!(config.shapes, ShapeCatalog::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(MaskConfig::from_yaml_str("raster: { width: 0, height: 10 }").is_err());
        assert!(MaskConfig::from_yaml_str("overlay: { opacity: 2.0 }").is_err());
        assert!(MaskConfig::from_yaml_str("bounds: [[10, 0], [0, 10]]").is_err());
        assert!(MaskConfig::from_yaml_str("default_kind: hexagon").is_err());
    }

    #[test]
    fn test_invalid_default_shape_rejected() {
        let err = MaskConfig::from_yaml_str(
            r##"
default_kind: rectangle
shapes:
  rectangle: { min: [70, 70], max: [20, 20] }
"##,
        )
        .unwrap_err();
        assert!(matches!(err, MaskError::InvalidGeometry(_)));
    }
}
