//! The viewer engine: tile orchestration, rendering, and animation.
//!
//! A [`RasterViewer`] owns one cache, one HTTP client and the current view
//! state. The embedding app drives it in a loop: change the view, call
//! [`RasterViewer::refresh`] to fill the cache, call
//! [`RasterViewer::render_visible`] to get pixels.

mod animation;
mod config;
mod engine;

pub use animation::AnimationController;
pub use config::ViewerConfig;
pub use engine::{RasterViewer, RefreshReport};
