//! Geographic bounding box for viewport math.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
///
/// `north > south` and `east > west` are expected after longitude
/// normalization. A viewport crossing the antimeridian must be split by
/// the caller; this engine does not stitch wraparound views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// The whole-world bounds.
    pub fn global() -> Self {
        Self {
            north: 90.0,
            south: -90.0,
            east: 180.0,
            west: -180.0,
        }
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Whether the box is well-formed (north above south, east of west,
    /// within geographic range).
    pub fn is_valid(&self) -> bool {
        self.north > self.south
            && self.east > self.west
            && self.north <= 90.0
            && self.south >= -90.0
            && self.east <= 180.0
            && self.west >= -180.0
    }

    /// Clamp the box to the geographic range without changing its shape
    /// beyond what the clamp requires.
    pub fn clamped(&self) -> Self {
        Self {
            north: self.north.min(90.0),
            south: self.south.max(-90.0),
            east: self.east.min(180.0),
            west: self.west.max(-180.0),
        }
    }

    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        lat <= self.north && lat >= self.south && lon >= self.west && lon <= self.east
    }
}
