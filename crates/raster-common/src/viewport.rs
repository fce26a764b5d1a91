//! Viewport-to-tile coordinate mapping.
//!
//! The dataset grid is equirectangular (plain lat/lon, no Mercator):
//! longitude maps linearly onto `[0, 2^z)` columns and latitude onto
//! `[0, 2^z)` rows, with row 0 at the north edge.

use crate::bounds::GeoBounds;
use crate::tile::{TileAddress, MAX_ZOOM};

/// Compute the set of tile addresses covering a viewport at a zoom level.
///
/// Lower bounds are floored, upper bounds are ceiled, and both are clamped
/// to `[0, 2^z - 1]`, so every returned address is valid even for viewports
/// that spill past the dataset edge. A viewport crossing the antimeridian
/// must be split by the caller first; unsplit (inverted) bounds and zoom
/// levels past [`MAX_ZOOM`] yield an empty set rather than addresses that
/// could never be fetched.
pub fn tiles_for_viewport(bounds: &GeoBounds, zoom: u8) -> Vec<TileAddress> {
    if zoom > MAX_ZOOM || bounds.north <= bounds.south || bounds.east <= bounds.west {
        return Vec::new();
    }

    let n = (1u32 << zoom) as f64;
    let max_index = n - 1.0;

    let x_min = ((bounds.west + 180.0) / 360.0 * n).floor().clamp(0.0, max_index) as u32;
    let x_max = ((bounds.east + 180.0) / 360.0 * n).ceil().clamp(0.0, max_index) as u32;

    // y counts from the north edge, so the viewport's north latitude gives
    // the smaller row index.
    let y_min = ((90.0 - bounds.north) / 180.0 * n).floor().clamp(0.0, max_index) as u32;
    let y_max = ((90.0 - bounds.south) / 180.0 * n).ceil().clamp(0.0, max_index) as u32;

    let mut tiles = Vec::with_capacity(
        ((x_max - x_min + 1) as usize) * ((y_max - y_min + 1) as usize),
    );
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            tiles.push(TileAddress::new(zoom, x, y));
        }
    }
    tiles
}

/// Geographic bounds of a single tile (inverse of the mapping above).
pub fn tile_bounds(addr: &TileAddress) -> GeoBounds {
    let n = addr.tiles_per_row() as f64;

    let west = addr.x as f64 / n * 360.0 - 180.0;
    let east = (addr.x + 1) as f64 / n * 360.0 - 180.0;
    let north = 90.0 - addr.y as f64 / n * 180.0;
    let south = 90.0 - (addr.y + 1) as f64 / n * 180.0;

    GeoBounds::new(north, south, east, west)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_zero_is_one_tile() {
        let tiles = tiles_for_viewport(&GeoBounds::global(), 0);
        assert_eq!(tiles, vec![TileAddress::new(0, 0, 0)]);
    }

    #[test]
    fn global_viewport_covers_full_grid() {
        let tiles = tiles_for_viewport(&GeoBounds::global(), 2);
        assert_eq!(tiles.len(), 16);
        for t in &tiles {
            assert!(t.is_valid());
        }
    }

    #[test]
    fn small_viewport_selects_neighborhood() {
        // A viewport inside the north-west quadrant at zoom 2.
        let bounds = GeoBounds::new(80.0, 60.0, -120.0, -150.0);
        let tiles = tiles_for_viewport(&bounds, 2);

        // West edge: (-150+180)/360*4 = 0.33 -> floor 0
        // East edge: (-120+180)/360*4 = 0.66 -> ceil 1
        // North edge: (90-80)/180*4 = 0.22 -> floor 0
        // South edge: (90-60)/180*4 = 0.66 -> ceil 1
        let expected: Vec<TileAddress> = [(0, 0), (1, 0), (0, 1), (1, 1)]
            .iter()
            .map(|&(x, y)| TileAddress::new(2, x, y))
            .collect();
        assert_eq!(tiles, expected);
    }

    #[test]
    fn oversized_viewport_is_clamped() {
        let bounds = GeoBounds::new(120.0, -120.0, 250.0, -250.0);
        for zoom in 0..=6u8 {
            let n = 2u32.pow(zoom as u32);
            let tiles = tiles_for_viewport(&bounds, zoom);
            assert_eq!(tiles.len() as u32, n * n);
            for t in &tiles {
                assert!(t.x < n && t.y < n, "address {} out of range", t);
            }
        }
    }

    #[test]
    fn addresses_always_in_range() {
        // Sweep viewports across the globe; every produced address must
        // satisfy 0 <= x,y < 2^z.
        for zoom in 0..=8u8 {
            let n = 2u32.pow(zoom as u32);
            for lat in (-90..=80).step_by(17) {
                for lon in (-180..=170).step_by(23) {
                    let bounds =
                        GeoBounds::new((lat + 10) as f64, lat as f64, (lon + 10) as f64, lon as f64);
                    for t in tiles_for_viewport(&bounds, zoom) {
                        assert!(t.x < n && t.y < n, "address {} out of range", t);
                    }
                }
            }
        }
    }

    #[test]
    fn unrepresentable_zoom_yields_no_tiles() {
        assert!(tiles_for_viewport(&GeoBounds::global(), 33).is_empty());
        assert!(tiles_for_viewport(&GeoBounds::global(), u8::MAX).is_empty());

        // The deepest representable zoom still works on a small viewport.
        let bounds = GeoBounds::new(1e-6, 0.0, 1e-6, 0.0);
        for t in tiles_for_viewport(&bounds, MAX_ZOOM) {
            assert!(t.is_valid());
        }
    }

    #[test]
    fn unsplit_antimeridian_bounds_yield_no_tiles() {
        // A viewport crossing the antimeridian (east < west) that the
        // caller failed to split.
        let bounds = GeoBounds::new(10.0, -10.0, -170.0, 170.0);
        assert!(tiles_for_viewport(&bounds, 4).is_empty());

        let degenerate = GeoBounds::new(10.0, 10.0, 20.0, 20.0);
        assert!(tiles_for_viewport(&degenerate, 4).is_empty());
    }

    #[test]
    fn tile_bounds_roundtrip() {
        let addr = TileAddress::new(3, 5, 2);
        let b = tile_bounds(&addr);
        assert!(b.is_valid());

        // The tile's own bounds must map back to a set containing the tile.
        // Shrink slightly so ceil on the shared edge doesn't pull in the
        // next tile over.
        let eps = 1e-9;
        let inner = GeoBounds::new(b.north - eps, b.south + eps, b.east - eps, b.west + eps);
        let tiles = tiles_for_viewport(&inner, 3);
        assert!(tiles.contains(&addr));
    }

    #[test]
    fn tile_bounds_zoom_zero_is_global() {
        let b = tile_bounds(&TileAddress::new(0, 0, 0));
        assert_eq!(b, GeoBounds::global());
    }
}
