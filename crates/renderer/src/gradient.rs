//! Color scales and value-to-color mapping.
//!
//! A color scale is an ordered list of `(position, rgb)` control points
//! with monotonic positions covering 0 and 1. A raw value is normalized
//! against the variable's statistics and linearly interpolated between the
//! bracketing pair of stops.

use raster_common::{ColorScale, VariableStats};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A control point of a color scale.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    /// Normalized position in `[0, 1]`.
    pub position: f32,
    pub color: Color,
}

const fn stop(position: f32, r: u8, g: u8, b: u8) -> ColorStop {
    ColorStop {
        position,
        color: Color::new(r, g, b),
    }
}

/// Viridis anchor colors (dark purple to yellow).
const VIRIDIS: [ColorStop; 5] = [
    stop(0.0, 68, 1, 84),
    stop(0.25, 59, 82, 139),
    stop(0.5, 33, 145, 140),
    stop(0.75, 94, 201, 98),
    stop(1.0, 253, 231, 37),
];

/// Plasma anchor colors (dark blue to yellow).
const PLASMA: [ColorStop; 5] = [
    stop(0.0, 13, 8, 135),
    stop(0.25, 126, 3, 168),
    stop(0.5, 204, 71, 120),
    stop(0.75, 248, 149, 64),
    stop(1.0, 240, 249, 33),
];

/// Precipitation ramp (white through blues).
const PRECIPITATION: [ColorStop; 5] = [
    stop(0.0, 255, 255, 255),
    stop(0.25, 161, 218, 180),
    stop(0.5, 65, 182, 196),
    stop(0.75, 44, 127, 184),
    stop(1.0, 37, 52, 148),
];

/// Control points for a named scale.
pub fn scale_stops(scale: ColorScale) -> &'static [ColorStop] {
    match scale {
        ColorScale::Viridis => &VIRIDIS,
        ColorScale::Plasma => &PLASMA,
        ColorScale::Precipitation => &PRECIPITATION,
    }
}

/// Normalize a raw value against variable statistics.
///
/// Degenerate ranges (`max == min`) normalize to 0 so the division by
/// zero never happens; the whole tile then renders in the scale's first
/// color.
fn normalize(value: f32, stats: &VariableStats) -> f32 {
    let range = stats.max - stats.min;
    if range <= 0.0 {
        return 0.0;
    }
    ((value - stats.min) / range).clamp(0.0, 1.0)
}

/// Map a raw value through a named color scale. Pure.
pub fn color_for(value: f32, stats: &VariableStats, scale: ColorScale) -> Color {
    let t = normalize(value, stats);
    let stops = scale_stops(scale);

    if t >= 1.0 {
        return stops[stops.len() - 1].color;
    }

    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.position {
            let span = hi.position - lo.position;
            let local = if span > 0.0 { (t - lo.position) / span } else { 0.0 };
            return interpolate(lo.color, hi.color, local);
        }
    }

    stops[stops.len() - 1].color
}

/// Linear per-channel interpolation between two colors.
fn interpolate(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b))
}

/// Pixel alpha for an opacity percentage.
///
/// Opacity is clamped to `[10, 100]`; it scales the alpha channel only and
/// never touches the color channels.
pub fn alpha_for(opacity: u8) -> u8 {
    let opacity = opacity.clamp(10, 100);
    (opacity as f32 * 2.55).round() as u8
}
