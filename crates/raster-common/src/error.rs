//! Error types for the tile engine.

use thiserror::Error;

/// Result type alias using TileError.
pub type TileResult<T> = Result<T, TileError>;

/// Primary error type for tile engine operations.
///
/// Per-tile errors are local: they mark a single `TileKey` as errored and
/// never abort other tile requests or animation playback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    // === Transport ===
    #[error("network error: {0}")]
    Network(String),

    #[error("tile server responded with HTTP {status}")]
    Http { status: u16 },

    #[error("session is not authenticated")]
    Unauthorized,

    // === Payload ===
    #[error("malformed tile payload: {0}")]
    Decode(String),

    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    // === Caller input ===
    #[error("invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("unknown variable: {0}")]
    UnknownVariable(String),
}

impl From<serde_json::Error> for TileError {
    fn from(err: serde_json::Error) -> Self {
        TileError::Decode(err.to_string())
    }
}
