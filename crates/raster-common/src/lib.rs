//! Common types shared across the climate-tiles workspace.
//!
//! Holds the data model for the tile engine (tile addresses and keys,
//! dataset metadata, view state) and the viewport-to-tile coordinate
//! mapping for the equirectangular grid.

pub mod bounds;
pub mod error;
pub mod metadata;
pub mod tile;
pub mod view;
pub mod viewport;

pub use bounds::GeoBounds;
pub use error::{TileError, TileResult};
pub use metadata::{DatasetAttributes, Dimensions, RasterMetadata, Resolution, VariableStats};
pub use tile::{Tile, TileAddress, TileKey, MAX_ZOOM, TILE_CELLS, TILE_SIZE};
pub use view::{ColorScale, ViewState};
pub use viewport::{tile_bounds, tiles_for_viewport};
