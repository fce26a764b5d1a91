//! Dataset metadata: dimensions, variables, per-variable statistics.
//!
//! Metadata is fetched once per dataset selection, validated at the API
//! boundary, and then immutable for the session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::bounds::GeoBounds;
use crate::error::{TileError, TileResult};

/// Grid dimensions of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub time: usize,
    pub lat: usize,
    pub lon: usize,
}

/// Grid resolution in degrees per cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub lat: f64,
    pub lon: f64,
}

/// Free-form dataset attributes surfaced in the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetAttributes {
    pub title: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Per-variable statistics used for color normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub units: String,
}

/// Metadata describing one raster dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterMetadata {
    pub dimensions: Dimensions,
    pub variables: Vec<String>,
    pub bounds: GeoBounds,
    pub resolution: Resolution,
    pub attributes: DatasetAttributes,
    pub statistics: HashMap<String, VariableStats>,
}

impl RasterMetadata {
    /// Validate the invariants the rest of the engine relies on.
    ///
    /// Called once at the decode boundary; a metadata object that passes
    /// here is safe to use unchecked everywhere else.
    pub fn validate(&self) -> TileResult<()> {
        if self.dimensions.time == 0 || self.dimensions.lat == 0 || self.dimensions.lon == 0 {
            return Err(TileError::InvalidMetadata(
                "dimensions must be positive".into(),
            ));
        }
        if self.variables.is_empty() {
            return Err(TileError::InvalidMetadata("no variables".into()));
        }
        for (i, var) in self.variables.iter().enumerate() {
            if self.variables[..i].contains(var) {
                return Err(TileError::InvalidMetadata(format!(
                    "duplicate variable '{}'",
                    var
                )));
            }
            // Every variable must be renderable, so its normalization
            // statistics have to be present up front.
            if !self.statistics.contains_key(var) {
                return Err(TileError::InvalidMetadata(format!(
                    "missing statistics for variable '{}'",
                    var
                )));
            }
        }
        if !self.bounds.is_valid() {
            return Err(TileError::InvalidMetadata(format!(
                "invalid bounds: {:?}",
                self.bounds
            )));
        }
        if self.resolution.lat <= 0.0 || self.resolution.lon <= 0.0 {
            return Err(TileError::InvalidMetadata(
                "resolution must be positive".into(),
            ));
        }
        for (var, stats) in &self.statistics {
            if !(stats.min <= stats.mean && stats.mean <= stats.max) {
                return Err(TileError::InvalidMetadata(format!(
                    "statistics for '{}' violate min <= mean <= max",
                    var
                )));
            }
        }
        Ok(())
    }

    /// Statistics for one variable.
    pub fn stats_for(&self, variable: &str) -> TileResult<&VariableStats> {
        self.statistics
            .get(variable)
            .ok_or_else(|| TileError::UnknownVariable(variable.to_string()))
    }

    /// Length of the time axis.
    pub fn time_count(&self) -> usize {
        self.dimensions.time
    }

    /// First variable in the dataset's declared order.
    pub fn first_variable(&self) -> &str {
        &self.variables[0]
    }

    /// Hardcoded fallback used when the metadata endpoint is unreachable,
    /// keeping the viewer usable in a degraded mode: a global 1° monthly
    /// grid with a single near-surface temperature variable.
    pub fn fallback() -> Self {
        let mut statistics = HashMap::new();
        statistics.insert(
            "tas".to_string(),
            VariableStats {
                min: -40.0,
                max: 40.0,
                mean: 14.0,
                units: "degC".to_string(),
            },
        );
        Self {
            dimensions: Dimensions {
                time: 12,
                lat: 180,
                lon: 360,
            },
            variables: vec!["tas".to_string()],
            bounds: GeoBounds::global(),
            resolution: Resolution { lat: 1.0, lon: 1.0 },
            attributes: DatasetAttributes {
                title: "NetCDF Dataset".to_string(),
                institution: None,
                comment: None,
            },
            statistics,
        }
    }
}
