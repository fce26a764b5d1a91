//! Common test fixtures.

use std::collections::HashMap;

use raster_common::{
    DatasetAttributes, Dimensions, GeoBounds, RasterMetadata, Resolution, VariableStats,
};

/// Statistics for the precipitation fixture variable.
pub fn pr_stats() -> VariableStats {
    VariableStats {
        min: 0.0,
        max: 0.05,
        mean: 0.0025,
        units: "kg m-2 s-1".to_string(),
    }
}

/// A CMIP-style monthly precipitation dataset: 24 time steps on a global
/// 1° grid with a single variable `pr`.
pub fn pr_metadata() -> RasterMetadata {
    let mut statistics = HashMap::new();
    statistics.insert("pr".to_string(), pr_stats());

    RasterMetadata {
        dimensions: Dimensions {
            time: 24,
            lat: 180,
            lon: 360,
        },
        variables: vec!["pr".to_string()],
        bounds: GeoBounds::global(),
        resolution: Resolution { lat: 1.0, lon: 1.0 },
        attributes: DatasetAttributes {
            title: "Monthly precipitation".to_string(),
            institution: Some("Test Institute".to_string()),
            comment: None,
        },
        statistics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_metadata_is_valid() {
        assert!(pr_metadata().validate().is_ok());
    }
}
