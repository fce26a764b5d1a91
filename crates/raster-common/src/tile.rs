//! Tile addressing and tile payload types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TileError, TileResult};

/// Edge length of a tile in grid cells.
pub const TILE_SIZE: usize = 256;

/// Number of cells in one tile.
pub const TILE_CELLS: usize = TILE_SIZE * TILE_SIZE;

/// Highest zoom level; `2^z` tiles per axis must fit in `u32`.
pub const MAX_ZOOM: u8 = 31;

/// A tile address (z/x/y) in the power-of-two tiling scheme.
///
/// Zoom level `z` divides the grid into `2^z × 2^z` tiles; `x` counts from
/// the west edge and `y` from the north edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileAddress {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileAddress {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles per axis at this zoom level.
    ///
    /// Zoom levels beyond [`MAX_ZOOM`] saturate rather than overflow; such
    /// addresses never pass [`is_valid`](Self::is_valid).
    pub fn tiles_per_row(&self) -> u32 {
        1u32 << self.z.min(MAX_ZOOM)
    }

    /// Whether the zoom is representable and `x`, `y` are inside `[0, 2^z)`.
    pub fn is_valid(&self) -> bool {
        if self.z > MAX_ZOOM {
            return false;
        }
        let n = self.tiles_per_row();
        self.x < n && self.y < n
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// The full identity of a requested tile.
///
/// Embedding variable and time index means a fetch started under a stale
/// view state can only ever populate its own slot; it can never overwrite
/// a key the current view reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileKey {
    pub variable: String,
    pub time_index: usize,
    pub addr: TileAddress,
}

impl TileKey {
    pub fn new(variable: impl Into<String>, time_index: usize, addr: TileAddress) -> Self {
        Self {
            variable: variable.into(),
            time_index,
            addr,
        }
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.variable, self.time_index, self.addr)
    }
}

/// A decoded tile: a row-major 256×256 value matrix plus the key it answers.
///
/// Missing cells are carried as NaN; the renderer substitutes `0.0` at draw
/// time (see `renderer::raster`).
#[derive(Debug, Clone)]
pub struct Tile {
    pub key: TileKey,
    values: Vec<f32>,
}

impl Tile {
    /// Build a tile from row-major values, enforcing the 256×256 shape.
    pub fn new(key: TileKey, values: Vec<f32>) -> TileResult<Self> {
        if values.len() != TILE_CELLS {
            return Err(TileError::Decode(format!(
                "expected {} cells, got {}",
                TILE_CELLS,
                values.len()
            )));
        }
        Ok(Self { key, values })
    }

    /// A tile with every cell set to `value`.
    pub fn uniform(key: TileKey, value: f32) -> Self {
        Self {
            key,
            values: vec![value; TILE_CELLS],
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn value_at(&self, row: usize, col: usize) -> f32 {
        self.values[row * TILE_SIZE + col]
    }
}
