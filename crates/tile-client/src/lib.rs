//! HTTP client for the raster tile backend.

mod client;
mod token;

pub use client::{TileClient, TileClientConfig};
pub use token::TokenStore;
