//! Tile rendering: numeric matrix to RGBA pixel buffer.

use raster_common::{ColorScale, Tile, VariableStats, TILE_SIZE};

use crate::gradient::{alpha_for, color_for};

/// Render a tile to a 256×256 RGBA pixel buffer in row-major order.
///
/// Deterministic: identical inputs produce byte-identical output.
///
/// Missing cells (NaN or infinite values) are drawn as if the value were
/// `0.0`. This conflates "no data" with an actual zero reading, which is
/// wrong for variables like precipitation where zero is meaningful; it is
/// kept for parity with the upstream data contract and is a known
/// limitation rather than a choice this renderer defends.
pub fn render_tile(
    tile: &Tile,
    stats: &VariableStats,
    scale: ColorScale,
    opacity: u8,
) -> Vec<u8> {
    let alpha = alpha_for(opacity);
    let mut pixels = vec![0u8; TILE_SIZE * TILE_SIZE * 4];

    for (idx, &raw) in tile.values().iter().enumerate() {
        let value = if raw.is_finite() { raw } else { 0.0 };
        let color = color_for(value, stats, scale);

        let offset = idx * 4;
        pixels[offset] = color.r;
        pixels[offset + 1] = color.g;
        pixels[offset + 2] = color.b;
        pixels[offset + 3] = alpha;
    }

    pixels
}
