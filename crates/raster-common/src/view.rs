//! View state: the single source of truth for which tiles are wanted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bounds::GeoBounds;
use crate::error::TileError;
use crate::metadata::RasterMetadata;
use crate::tile::TileKey;
use crate::viewport::tiles_for_viewport;

/// Named color scale for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorScale {
    #[default]
    Viridis,
    Plasma,
    Precipitation,
}

impl fmt::Display for ColorScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorScale::Viridis => "viridis",
            ColorScale::Plasma => "plasma",
            ColorScale::Precipitation => "precipitation",
        };
        f.write_str(name)
    }
}

impl FromStr for ColorScale {
    type Err = TileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viridis" => Ok(ColorScale::Viridis),
            "plasma" => Ok(ColorScale::Plasma),
            "precipitation" => Ok(ColorScale::Precipitation),
            other => Err(TileError::InvalidViewport(format!(
                "unknown color scale '{}'",
                other
            ))),
        }
    }
}

/// The current viewport, zoom, variable, time and styling.
///
/// Any field change invalidates the wanted-tile set, never the cache
/// itself: stale-view fetches land in their own cache slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub bounds: GeoBounds,
    pub zoom: u8,
    pub variable: String,
    pub time_index: usize,
    pub color_scale: ColorScale,
    /// Overlay opacity as a percentage in `[10, 100]`.
    pub opacity: u8,
}

impl ViewState {
    /// Initial view over a dataset: global extent, zoom 0, first variable,
    /// first time step.
    pub fn initial(metadata: &RasterMetadata) -> Self {
        Self {
            bounds: metadata.bounds,
            zoom: 0,
            variable: metadata.first_variable().to_string(),
            time_index: 0,
            color_scale: ColorScale::default(),
            opacity: 80,
        }
    }

    /// The tile keys this view wants, in scan order.
    pub fn wanted_tiles(&self) -> Vec<TileKey> {
        tiles_for_viewport(&self.bounds, self.zoom)
            .into_iter()
            .map(|addr| TileKey::new(self.variable.clone(), self.time_index, addr))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_scale_roundtrip() {
        for scale in [
            ColorScale::Viridis,
            ColorScale::Plasma,
            ColorScale::Precipitation,
        ] {
            assert_eq!(scale.to_string().parse::<ColorScale>().unwrap(), scale);
        }
        assert!("magma".parse::<ColorScale>().is_err());
    }

    #[test]
    fn initial_view_uses_first_variable() {
        let meta = RasterMetadata::fallback();
        let view = ViewState::initial(&meta);
        assert_eq!(view.variable, "tas");
        assert_eq!(view.zoom, 0);
        assert_eq!(view.time_index, 0);
        assert_eq!(view.wanted_tiles().len(), 1);
    }

    #[test]
    fn wanted_tiles_carry_variable_and_time() {
        let meta = RasterMetadata::fallback();
        let mut view = ViewState::initial(&meta);
        view.zoom = 1;
        view.time_index = 7;
        let keys = view.wanted_tiles();
        assert_eq!(keys.len(), 4);
        for key in keys {
            assert_eq!(key.variable, "tas");
            assert_eq!(key.time_index, 7);
        }
    }
}
