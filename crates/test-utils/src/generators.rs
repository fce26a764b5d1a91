//! Synthetic tile data generators.

use raster_common::{Tile, TileKey, TILE_SIZE};
use serde_json::{json, Value};

/// A tile with predictable per-cell values: `col * 1000 + row`.
///
/// Makes row-major ordering bugs visible: `tile.value_at(row, col)` must
/// equal `col * 1000 + row`.
pub fn patterned_tile(key: TileKey) -> Tile {
    let mut values = Vec::with_capacity(TILE_SIZE * TILE_SIZE);
    for row in 0..TILE_SIZE {
        for col in 0..TILE_SIZE {
            values.push((col * 1000 + row) as f32);
        }
    }
    Tile::new(key, values).expect("generator produces the exact tile shape")
}

/// The tile endpoint's JSON payload for a uniform tile.
pub fn tile_payload_json(key: &TileKey, value: f64) -> Value {
    let row: Vec<f64> = vec![value; TILE_SIZE];
    let matrix: Vec<Vec<f64>> = vec![row; TILE_SIZE];
    json!({
        "tile": matrix,
        "metadata": {
            "variable": key.variable,
            "time_index": key.time_index,
            "zoom": key.addr.z,
            "x": key.addr.x,
            "y": key.addr.y,
            "tile_size": TILE_SIZE,
        }
    })
}

/// A structurally broken tile payload (wrong row count) for decode tests.
pub fn malformed_tile_payload_json() -> Value {
    json!({
        "tile": [[0.0, 1.0], [2.0, 3.0]],
        "metadata": {
            "variable": "pr",
            "time_index": 0,
            "zoom": 0,
            "x": 0,
            "y": 0,
            "tile_size": 2,
        }
    })
}
