//! Heatmap rasterization of weighted sample points.
//!
//! Each pixel's value is the inverse-distance-weighted mean of the samples,
//! evaluated at the pixel centre in map units, then normalized to the value
//! range and coloured through a [`Gradient`].

use mask_common::{CoordinateTransform, GeoPoint, MaskError, MaskResult, PixelPoint};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::gradient::Gradient;
use crate::raster::RasterBuffer;

/// A weighted sample in map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct HeatPoint {
    pub position: GeoPoint,
    pub value: f64,
}

impl HeatPoint {
    pub const fn new(x: f64, y: f64, value: f64) -> Self {
        Self {
            position: GeoPoint::new(x, y),
            value,
        }
    }
}

impl From<[f64; 3]> for HeatPoint {
    fn from([x, y, value]: [f64; 3]) -> Self {
        Self::new(x, y, value)
    }
}

impl From<HeatPoint> for [f64; 3] {
    fn from(p: HeatPoint) -> Self {
        [p.position.x, p.position.y, p.value]
    }
}

/// Heatmap rendering parameters.
#[derive(Debug, Clone)]
pub struct HeatmapOptions {
    /// IDW distance exponent
    pub power: f64,
    /// Value mapped to the bottom of the gradient; defaults to the sample minimum
    pub min_value: Option<f64>,
    /// Value mapped to the top of the gradient; defaults to the sample maximum
    pub max_value: Option<f64>,
    /// Alpha written to every rendered pixel
    pub alpha: u8,
    pub gradient: Gradient,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            power: 2.0,
            min_value: None,
            max_value: None,
            alpha: 255,
            gradient: Gradient::default(),
        }
    }
}

/// Render `points` over the transform's bounds.
///
/// Fails with [`MaskError::CaptureFailed`] when there is nothing to render.
pub fn render_heatmap(
    points: &[HeatPoint],
    transform: &CoordinateTransform,
    options: &HeatmapOptions,
) -> MaskResult<RasterBuffer> {
    let samples: Vec<HeatPoint> = points
        .iter()
        .copied()
        .filter(|p| p.position.is_finite() && p.value.is_finite())
        .collect();
    if samples.is_empty() {
        return Err(MaskError::CaptureFailed(
            "heatmap has no finite sample points".to_string(),
        ));
    }
    let (width, height) = (transform.width(), transform.height());
    if width == 0 || height == 0 {
        return Err(MaskError::CaptureFailed(format!(
            "cannot render {}x{} heatmap",
            width, height
        )));
    }

    let data_min = samples.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let data_max = samples.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    let min_val = options.min_value.unwrap_or(data_min);
    let max_val = options.max_value.unwrap_or(data_max);
    let range = max_val - min_val;
    let range = if range.abs() < 1e-9 { 1.0 } else { range };

    let mut pixels = vec![0u8; width * height * 4];
    pixels
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(row, line)| {
            for (col, px) in line.chunks_exact_mut(4).enumerate() {
                let geo = transform.inverse(PixelPoint::new(col as f64 + 0.5, row as f64 + 0.5));
                let value = idw(&samples, &geo, options.power);
                let color = options
                    .gradient
                    .color_at(((value - min_val) / range) as f32);
                px.copy_from_slice(&[color.r, color.g, color.b, options.alpha]);
            }
        });

    debug!(
        width,
        height,
        samples = samples.len(),
        min = min_val,
        max = max_val,
        "Rendered heatmap"
    );

    RasterBuffer::new(width, height, pixels)
}

/// Inverse-distance-weighted mean of the samples at `at`.
pub fn idw(samples: &[HeatPoint], at: &GeoPoint, power: f64) -> f64 {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for sample in samples {
        let d2 = sample.position.distance_squared(at);
        if d2 < 1e-12 {
            return sample.value;
        }
        let w = 1.0 / d2.powf(power / 2.0);
        weighted += w * sample.value;
        total += w;
    }
    weighted / total
}
