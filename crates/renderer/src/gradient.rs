//! Colour gradients for heatmap rendering.

use serde::{Deserialize, Serialize};

use mask_common::{MaskError, MaskResult};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `#rrggbb`, `rrggbb`, or a CSS basic colour name.
    pub fn parse(s: &str) -> MaskResult<Self> {
        let s = s.trim();
        if let Some(color) = named_color(&s.to_lowercase()) {
            return Ok(color);
        }
        hex_to_rgb(s)
            .map(|(r, g, b)| Color::rgb(r, g, b))
            .ok_or_else(|| MaskError::Config(format!("unrecognized color '{}'", s)))
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::rgb(0, 0, 0),
        "white" => Color::rgb(255, 255, 255),
        "red" => Color::rgb(255, 0, 0),
        "lime" => Color::rgb(0, 255, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "cyan" | "aqua" => Color::rgb(0, 255, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "magenta" | "fuchsia" => Color::rgb(255, 0, 255),
        "orange" => Color::rgb(255, 165, 0),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        _ => return None,
    };
    Some(color)
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Color stop as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColorStop {
    /// Position along the gradient, 0.0..=1.0
    pub offset: f32,
    pub color: String,
}

/// A piecewise-linear colour ramp sampled into a 256-entry lookup table.
///
/// Values before the first stop take the first stop's colour and values after
/// the last stop take the last one's.
#[derive(Debug, Clone)]
pub struct Gradient {
    lut: Vec<Color>,
}

impl Gradient {
    pub fn from_stops(stops: &[ColorStop]) -> MaskResult<Self> {
        if stops.is_empty() {
            return Err(MaskError::Config("gradient needs at least one stop".to_string()));
        }

        let mut parsed = stops
            .iter()
            .map(|stop| {
                if !(0.0..=1.0).contains(&stop.offset) {
                    return Err(MaskError::Config(format!(
                        "gradient offset {} outside 0..1",
                        stop.offset
                    )));
                }
                Ok((stop.offset, Color::parse(&stop.color)?))
            })
            .collect::<MaskResult<Vec<_>>>()?;
        parsed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let lut = (0..256)
            .map(|i| sample_stops(&parsed, i as f32 / 255.0))
            .collect();
        Ok(Self { lut })
    }

    /// Colour for a normalized value; input is clamped to 0..1.
    pub fn color_at(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        self.lut[(t * 255.0).round() as usize]
    }
}

impl Default for Gradient {
    fn default() -> Self {
        // Stops are static and valid
        Self::from_stops(&default_stops()).unwrap_or_else(|_| Self {
            lut: vec![Color::rgb(255, 0, 0); 256],
        })
    }
}

/// Heatmap ramp: blue, cyan, lime, yellow, red.
pub fn default_stops() -> Vec<ColorStop> {
    [(0.4, "blue"), (0.6, "cyan"), (0.7, "lime"), (0.8, "yellow"), (1.0, "red")]
        .into_iter()
        .map(|(offset, color)| ColorStop {
            offset,
            color: color.to_string(),
        })
        .collect()
}

fn sample_stops(stops: &[(f32, Color)], t: f32) -> Color {
    let (first_offset, first) = stops[0];
    if t <= first_offset {
        return first;
    }
    for pair in stops.windows(2) {
        let (lo, lo_color) = pair[0];
        let (hi, hi_color) = pair[1];
        if t <= hi {
            let span = hi - lo;
            let f = if span <= f32::EPSILON { 1.0 } else { (t - lo) / span };
            return interpolate_color(lo_color, hi_color, f);
        }
    }
    stops[stops.len() - 1].1
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}
