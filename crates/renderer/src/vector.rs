//! Snapshot of drawn vector shapes into a raster.
//!
//! The raw (unmasked) presentation draws styled rectangles directly on the
//! map. To mask them they are first rasterized here at the overlay's
//! resolution, using source-over blending on straight alpha.

use mask_common::{CoordinateTransform, GeoPoint, MaskResult};
use serde::{Deserialize, Serialize};

use crate::gradient::Color;
use crate::raster::RasterBuffer;

/// Drawing style for a rectangle, as configured.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RectangleStyle {
    pub color: String,
    pub fill_color: String,
    #[serde(default = "default_fill_opacity")]
    pub fill_opacity: f32,
    /// Stroke width in pixels; 0 disables the outline
    #[serde(default)]
    pub weight: f32,
}

fn default_fill_opacity() -> f32 {
    0.2
}

/// A rectangle to draw, corners in map units.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StyledRectangle {
    pub min: GeoPoint,
    pub max: GeoPoint,
    #[serde(flatten)]
    pub style: RectangleStyle,
}

/// Rasterize rectangles in order onto a transparent canvas.
pub fn render_rectangles(
    rectangles: &[StyledRectangle],
    transform: &CoordinateTransform,
) -> MaskResult<RasterBuffer> {
    let mut raster = RasterBuffer::transparent(transform.width(), transform.height());
    for rect in rectangles {
        draw_rectangle(&mut raster, transform, rect)?;
    }
    Ok(raster)
}

fn draw_rectangle(
    raster: &mut RasterBuffer,
    transform: &CoordinateTransform,
    rect: &StyledRectangle,
) -> MaskResult<()> {
    let fill = Color::parse(&rect.style.fill_color)?;
    let stroke = Color::parse(&rect.style.color)?;

    // North-west corner is the top-left pixel
    let top_left = transform.forward(GeoPoint::new(rect.min.x, rect.max.y));
    let bottom_right = transform.forward(GeoPoint::new(rect.max.x, rect.min.y));
    let (x0, y0, x1, y1) = (top_left.x, top_left.y, bottom_right.x, bottom_right.y);

    let fill_alpha = rect.style.fill_opacity.clamp(0.0, 1.0);
    fill_region(raster, (x0, y0, x1, y1), fill, fill_alpha);

    let weight = rect.style.weight as f64;
    if weight > 0.0 {
        // Stroke is centred on the outline, like a canvas strokeRect
        let h = weight / 2.0;
        let outer = (x0 - h, y0 - h, x1 + h, y1 + h);
        let inner = (x0 + h, y0 + h, x1 - h, y1 - h);
        for (row, col) in pixel_centers(raster, outer) {
            let (cx, cy) = (col as f64 + 0.5, row as f64 + 0.5);
            let in_inner = cx >= inner.0 && cx < inner.2 && cy >= inner.1 && cy < inner.3;
            if !in_inner {
                blend_pixel(raster, col, row, stroke, 1.0);
            }
        }
    }
    Ok(())
}

fn fill_region(raster: &mut RasterBuffer, region: (f64, f64, f64, f64), color: Color, alpha: f32) {
    for (row, col) in pixel_centers(raster, region) {
        blend_pixel(raster, col, row, color, alpha);
    }
}

/// Pixels whose centres fall in `[x0, x1) x [y0, y1)`, clipped to the raster.
fn pixel_centers(
    raster: &RasterBuffer,
    (x0, y0, x1, y1): (f64, f64, f64, f64),
) -> impl Iterator<Item = (usize, usize)> {
    let clamp = |v: f64, max: usize| v.max(0.0).min(max as f64) as usize;
    let c0 = clamp((x0 - 0.5).ceil(), raster.width());
    let c1 = clamp((x1 - 0.5).ceil(), raster.width());
    let r0 = clamp((y0 - 0.5).ceil(), raster.height());
    let r1 = clamp((y1 - 0.5).ceil(), raster.height());
    (r0..r1).flat_map(move |row| (c0..c1).map(move |col| (row, col)))
}

/// Source-over composite of `color` at `opacity` onto pixel (x, y).
fn blend_pixel(raster: &mut RasterBuffer, x: usize, y: usize, color: Color, opacity: f32) {
    let Some(dst) = raster.pixel(x, y) else {
        return;
    };
    let sa = (color.a as f32 / 255.0) * opacity;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        raster.set_pixel(x, y, [0, 0, 0, 0]);
        return;
    }
    let channel = |s: u8, d: u8| -> u8 {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a).round() as u8
    };
    raster.set_pixel(
        x,
        y,
        [
            channel(color.r, dst[0]),
            channel(color.g, dst[1]),
            channel(color.b, dst[2]),
            (out_a * 255.0).round() as u8,
        ],
    );
}
