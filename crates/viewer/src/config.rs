//! Viewer configuration.

use std::time::Duration;

use tracing::warn;

/// Configuration for a viewer session.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Base URL of the raster backend.
    pub base_url: String,
    /// Cache entry lifetime.
    pub tile_ttl: Duration,
    /// Animation frame cadence.
    pub animation_interval: Duration,
    /// Initial overlay opacity as a percentage in `[10, 100]`.
    pub default_opacity: u8,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            tile_ttl: Duration::from_secs(300),
            animation_interval: Duration::from_millis(1000),
            default_opacity: 80,
        }
    }
}

impl ViewerConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable:
    ///
    /// - `RASTER_API_URL`
    /// - `TILE_CACHE_TTL_SECS`
    /// - `ANIMATION_INTERVAL_MS`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    // Split out from `from_env` so tests can inject values without
    // mutating process-global environment variables.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("RASTER_API_URL") {
            config.base_url = url;
        }
        if let Some(secs) = parse_u64("TILE_CACHE_TTL_SECS", lookup("TILE_CACHE_TTL_SECS")) {
            config.tile_ttl = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_u64("ANIMATION_INTERVAL_MS", lookup("ANIMATION_INTERVAL_MS")) {
            config.animation_interval = Duration::from_millis(ms);
        }
        config
    }
}

fn parse_u64(name: &str, raw: Option<String>) -> Option<u64> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring unparseable environment variable");
            None
        }
    }
}
