//! Tile and metadata fetching over HTTP.
//!
//! Errors are mapped onto the shared [`TileError`] taxonomy: transport
//! failures become `Network`, a 401 becomes `Unauthorized`, any other
//! non-2xx status becomes `Http`, and malformed payloads become `Decode`.
//! The client never retries; the caller decides when to try again.

use std::time::Duration;

use raster_common::{RasterMetadata, Tile, TileError, TileKey, TileResult, TILE_SIZE};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::token::TokenStore;

/// Configuration for the tile client.
#[derive(Debug, Clone)]
pub struct TileClientConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Default for TileClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Wire shape of the tile endpoint response.
///
/// Cells are nullable on the wire; `null` marks a missing value and is
/// carried forward as NaN.
#[derive(Debug, Deserialize)]
struct TilePayload {
    tile: Vec<Vec<Option<f32>>>,
}

/// HTTP client for the raster backend.
pub struct TileClient {
    client: Client,
    config: TileClientConfig,
    tokens: TokenStore,
}

impl TileClient {
    pub fn new(config: TileClientConfig, tokens: TokenStore) -> TileResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| TileError::Network(e.to_string()))?;

        Ok(Self {
            client,
            config,
            tokens,
        })
    }

    /// Fetch and validate dataset metadata.
    #[instrument(skip(self))]
    pub async fn fetch_metadata(&self) -> TileResult<RasterMetadata> {
        let url = format!("{}/api/v1/data/raster/metadata", self.config.base_url);
        let response = self.get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let metadata: RasterMetadata = response
            .json()
            .await
            .map_err(|e| TileError::Decode(e.to_string()))?;
        metadata.validate()?;

        debug!(
            time_steps = metadata.dimensions.time,
            variables = ?metadata.variables,
            "metadata loaded"
        );
        Ok(metadata)
    }

    /// Fetch metadata, falling back to a built-in default when the backend
    /// is unreachable or returns something unusable.
    pub async fn metadata_or_default(&self) -> RasterMetadata {
        match self.fetch_metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(error = %e, "metadata fetch failed, using fallback");
                let fallback = RasterMetadata::fallback();
                info!(
                    time_steps = fallback.dimensions.time,
                    variables = ?fallback.variables,
                    "using fallback metadata"
                );
                fallback
            }
        }
    }

    /// Fetch one tile.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn fetch_tile(&self, key: &TileKey) -> TileResult<Tile> {
        let url = format!(
            "{}/api/v1/data/raster/tile/{}/{}/{}/{}/{}",
            self.config.base_url, key.variable, key.time_index, key.addr.z, key.addr.x, key.addr.y
        );

        let response = self.get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let payload: TilePayload = response
            .json()
            .await
            .map_err(|e| TileError::Decode(e.to_string()))?;
        decode_tile(key.clone(), payload)
    }

    async fn get(&self, url: &str) -> TileResult<reqwest::Response> {
        let mut request = self.client.get(url);
        if let Some(token) = self.tokens.get().await {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        request
            .send()
            .await
            .map_err(|e| TileError::Network(e.to_string()))
    }
}

fn status_error(status: StatusCode) -> TileError {
    if status == StatusCode::UNAUTHORIZED {
        TileError::Unauthorized
    } else {
        TileError::Http {
            status: status.as_u16(),
        }
    }
}

fn decode_tile(key: TileKey, payload: TilePayload) -> TileResult<Tile> {
    if payload.tile.len() != TILE_SIZE {
        return Err(TileError::Decode(format!(
            "expected {} rows, got {}",
            TILE_SIZE,
            payload.tile.len()
        )));
    }

    let mut values = Vec::with_capacity(TILE_SIZE * TILE_SIZE);
    for (i, row) in payload.tile.iter().enumerate() {
        if row.len() != TILE_SIZE {
            return Err(TileError::Decode(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                TILE_SIZE
            )));
        }
        values.extend(row.iter().map(|cell| cell.unwrap_or(f32::NAN)));
    }

    Tile::new(key, values)
}
