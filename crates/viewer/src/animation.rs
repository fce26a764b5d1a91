//! Temporal animation: a fixed-cadence task stepping the time axis.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::engine::RasterViewer;

/// Plays the dataset's time axis on a fixed cadence.
///
/// Each tick advances the viewer's `time_index` by one, wrapping at the
/// end of the axis. Advancing invalidates no cache entries, only the
/// wanted-tile set; the embedding app's render loop keeps calling
/// `refresh`/`render_visible` at its own pace.
pub struct AnimationController {
    viewer: RasterViewer,
    interval: Duration,
    playing: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl AnimationController {
    pub fn new(viewer: RasterViewer, interval: Duration) -> Self {
        Self {
            viewer,
            interval,
            playing: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    /// Start playback. Idempotent while already playing.
    pub fn play(&mut self) {
        if self.playing.swap(true, Ordering::SeqCst) {
            return;
        }

        let viewer = self.viewer.clone();
        let playing = Arc::clone(&self.playing);
        let period = self.interval;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval completes immediately;
            // consume it so the first advance lands one period after play.
            ticker.tick().await;

            while playing.load(Ordering::SeqCst) {
                ticker.tick().await;
                let time_index = viewer.advance_time().await;
                debug!(time_index, "animation frame");
            }
        }));
    }

    /// Stop playback. The current `time_index` stays where it is.
    pub fn pause(&mut self) {
        self.playing.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

impl Drop for AnimationController {
    fn drop(&mut self) {
        self.pause();
    }
}
