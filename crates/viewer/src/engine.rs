//! Fetch orchestration: cache-miss → single-flight fetch → render.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use raster_common::{
    ColorScale, GeoBounds, RasterMetadata, TileError, TileKey, TileResult, ViewState, MAX_ZOOM,
};
use renderer::render_tile;
use tile_cache::{CacheStats, TileCache};
use tile_client::TileClient;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::ViewerConfig;

/// Outcome of one [`RasterViewer::refresh`] pass over the wanted-tile set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Tiles the current view wants.
    pub wanted: usize,
    /// Already in cache and fresh.
    pub cached: usize,
    /// A fetch was already in flight; no new request issued.
    pub in_flight: usize,
    /// Previously errored; not re-attempted until the view changes.
    pub skipped_errored: usize,
    /// Fetched and inserted this pass.
    pub fetched: usize,
    /// Fetch attempted this pass and failed.
    pub failed: usize,
}

struct Inner {
    client: TileClient,
    cache: TileCache,
    metadata: RasterMetadata,
    view: RwLock<ViewState>,
    errored: RwLock<HashMap<TileKey, TileError>>,
}

/// A viewer session over one dataset.
///
/// Cheap to clone; clones share the cache, view state and error set.
/// Everything is owned by the session and dropped with it.
#[derive(Clone)]
pub struct RasterViewer {
    inner: Arc<Inner>,
}

impl RasterViewer {
    /// Build a viewer over already-fetched metadata.
    pub fn new(
        client: TileClient,
        metadata: RasterMetadata,
        config: &ViewerConfig,
    ) -> TileResult<Self> {
        metadata.validate()?;
        let mut view = ViewState::initial(&metadata);
        view.opacity = config.default_opacity.clamp(10, 100);
        Ok(Self {
            inner: Arc::new(Inner {
                client,
                cache: TileCache::new(config.tile_ttl),
                metadata,
                view: RwLock::new(view),
                errored: RwLock::new(HashMap::new()),
            }),
        })
    }

    /// Fetch metadata from the backend (falling back to the built-in
    /// default when unreachable) and build a viewer over it.
    pub async fn connect(client: TileClient, config: &ViewerConfig) -> TileResult<Self> {
        let metadata = client.metadata_or_default().await;
        Self::new(client, metadata, config)
    }

    pub fn metadata(&self) -> &RasterMetadata {
        &self.inner.metadata
    }

    /// Snapshot of the current view state.
    pub async fn view(&self) -> ViewState {
        self.inner.view.read().await.clone()
    }

    /// Move the viewport. Re-arms previously errored keys.
    pub async fn set_viewport(&self, bounds: GeoBounds, zoom: u8) -> TileResult<()> {
        if !bounds.is_valid() {
            return Err(TileError::InvalidViewport(format!("{:?}", bounds)));
        }
        if zoom > MAX_ZOOM {
            return Err(TileError::InvalidViewport(format!(
                "zoom {} exceeds max {}",
                zoom, MAX_ZOOM
            )));
        }
        {
            let mut view = self.inner.view.write().await;
            view.bounds = bounds;
            view.zoom = zoom;
        }
        self.clear_errors().await;
        Ok(())
    }

    /// Switch the displayed variable. Re-arms previously errored keys.
    pub async fn set_variable(&self, variable: &str) -> TileResult<()> {
        if !self.inner.metadata.variables.iter().any(|v| v == variable) {
            return Err(TileError::UnknownVariable(variable.to_string()));
        }
        self.inner.view.write().await.variable = variable.to_string();
        self.clear_errors().await;
        Ok(())
    }

    /// Jump to a time step. Re-arms previously errored keys.
    pub async fn set_time_index(&self, time_index: usize) -> TileResult<()> {
        let count = self.inner.metadata.time_count();
        if time_index >= count {
            return Err(TileError::InvalidViewport(format!(
                "time index {} out of range 0..{}",
                time_index, count
            )));
        }
        self.inner.view.write().await.time_index = time_index;
        self.clear_errors().await;
        Ok(())
    }

    /// Step to the next time index, wrapping at the end of the time axis.
    /// Returns the new index.
    pub async fn advance_time(&self) -> usize {
        let next = {
            let mut view = self.inner.view.write().await;
            view.time_index = (view.time_index + 1) % self.inner.metadata.time_count();
            view.time_index
        };
        self.clear_errors().await;
        next
    }

    /// Change the color scale. Pure styling; the wanted-tile set and the
    /// error set are untouched.
    pub async fn set_color_scale(&self, scale: ColorScale) {
        self.inner.view.write().await.color_scale = scale;
    }

    /// Change the overlay opacity, clamped to `[10, 100]`.
    pub async fn set_opacity(&self, opacity: u8) {
        self.inner.view.write().await.opacity = opacity.clamp(10, 100);
    }

    /// Bring the cache up to date with the current view.
    ///
    /// Walks the wanted-tile set and spawns one fetch per key that is
    /// neither cached, in flight, nor marked errored. Waits for the fetches
    /// it started; concurrent refreshes never duplicate a request because
    /// the pending claim is taken before any network call.
    pub async fn refresh(&self) -> RefreshReport {
        let wanted = self.inner.view.read().await.wanted_tiles();
        let mut report = RefreshReport {
            wanted: wanted.len(),
            ..RefreshReport::default()
        };

        let mut handles = Vec::new();
        for key in wanted {
            if self.inner.cache.get(&key).await.is_some() {
                report.cached += 1;
                continue;
            }
            if self.inner.errored.read().await.contains_key(&key) {
                report.skipped_errored += 1;
                continue;
            }
            if !self.inner.cache.mark_pending(&key).await {
                report.in_flight += 1;
                continue;
            }

            let inner = Arc::clone(&self.inner);
            handles.push(tokio::spawn(async move {
                let fetched = match inner.client.fetch_tile(&key).await {
                    Ok(tile) => {
                        inner.cache.put(tile).await;
                        true
                    }
                    Err(e) => {
                        warn!(key = %key, error = %e, "tile fetch failed");
                        inner.errored.write().await.insert(key.clone(), e);
                        false
                    }
                };
                inner.cache.clear_pending(&key).await;
                fetched
            }));
        }

        for outcome in join_all(handles).await {
            match outcome {
                Ok(true) => report.fetched += 1,
                Ok(false) => report.failed += 1,
                Err(e) => {
                    warn!(error = %e, "tile fetch task aborted");
                    report.failed += 1;
                }
            }
        }

        debug!(
            wanted = report.wanted,
            cached = report.cached,
            fetched = report.fetched,
            failed = report.failed,
            "refresh pass complete"
        );
        report
    }

    /// Render every cached tile of the current view to RGBA pixels.
    ///
    /// Tiles that are missing, stale, in flight or errored are simply
    /// absent from the result; the map layer keeps showing whatever it had.
    pub async fn render_visible(&self) -> TileResult<Vec<(TileKey, Vec<u8>)>> {
        let view = self.inner.view.read().await.clone();
        let stats = self.inner.metadata.stats_for(&view.variable)?;

        let mut rendered = Vec::new();
        for key in view.wanted_tiles() {
            if let Some(tile) = self.inner.cache.get(&key).await {
                let pixels = render_tile(&tile, stats, view.color_scale, view.opacity);
                rendered.push((key, pixels));
            }
        }
        Ok(rendered)
    }

    /// Whether a fetch for this key is currently in flight.
    pub async fn is_loading(&self, key: &TileKey) -> bool {
        self.inner.cache.is_pending(key).await
    }

    /// Keys whose last fetch failed, awaiting a view change to re-arm.
    pub async fn failed_tiles(&self) -> Vec<TileKey> {
        self.inner.errored.read().await.keys().cloned().collect()
    }

    /// The error recorded for a key, if its last fetch failed.
    pub async fn error_for(&self, key: &TileKey) -> Option<TileError> {
        self.inner.errored.read().await.get(key).cloned()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    pub async fn cached_tile_count(&self) -> usize {
        self.inner.cache.len().await
    }

    async fn clear_errors(&self) {
        self.inner.errored.write().await.clear();
    }
}
