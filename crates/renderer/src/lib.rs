//! Rendering of raster tiles for map display.
//!
//! Implements:
//! - Piecewise-linear color scales (viridis, plasma, precipitation)
//! - Tile matrix to RGBA pixel buffer rendering
//! - PNG encoding of the pixel buffer

pub mod gradient;
pub mod png;
pub mod raster;

pub use gradient::{alpha_for, color_for, scale_stops, Color, ColorStop};
pub use png::{encode_png, PngError};
pub use raster::render_tile;
