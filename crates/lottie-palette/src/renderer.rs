//! Playback collaborator contract.
//!
//! The editor never renders frames itself. It hands the live document to an
//! [`AnimationRenderer`] after every visible change and keeps the playhead
//! where the user left it.

use lottie_data::model::LottieHeader;
use serde_json::Value;

pub trait AnimationRenderer {
    /// Loads `document`, replacing whatever was loaded before.
    fn load(&mut self, document: &Value);
    fn destroy(&mut self);
    fn seek(&mut self, frame: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn current_frame(&self) -> f64;
    fn total_frames(&self) -> f64;
    /// True once the loaded content can be drawn.
    fn is_ready(&self) -> bool;
}

/// Headless renderer: tracks playback state and frame count only.
#[derive(Debug, Clone)]
pub struct NullRenderer {
    loaded: bool,
    paused: bool,
    frame: f64,
    total: f64,
    loads: usize,
}

impl Default for NullRenderer {
    fn default() -> Self {
        Self {
            loaded: false,
            paused: true,
            frame: 0.0,
            total: 0.0,
            loads: 0,
        }
    }
}

impl NullRenderer {
    /// How many times a document has been loaded.
    pub fn load_count(&self) -> usize {
        self.loads
    }
}

impl AnimationRenderer for NullRenderer {
    fn load(&mut self, document: &Value) {
        self.total = LottieHeader::from_value(document)
            .map(|header| header.total_frames().round().max(0.0))
            .unwrap_or(0.0);
        self.frame = 0.0;
        self.loaded = true;
        self.loads += 1;
    }

    fn destroy(&mut self) {
        self.loaded = false;
        self.total = 0.0;
        self.frame = 0.0;
    }

    fn seek(&mut self, frame: f64) {
        let last = (self.total - 1.0).max(0.0);
        self.frame = frame.clamp(0.0, last);
    }

    fn play(&mut self) {
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_frame(&self) -> f64 {
        self.frame
    }

    fn total_frames(&self) -> f64 {
        self.total
    }

    fn is_ready(&self) -> bool {
        self.loaded
    }
}

/// Replaces the renderer's content with `document`, restoring the playhead
/// and play/pause state from before the reload.
pub fn reload(renderer: &mut dyn AnimationRenderer, document: &Value) {
    let frame = renderer.current_frame();
    let paused = renderer.is_paused();
    renderer.destroy();
    renderer.load(document);
    renderer.seek(frame);
    if paused {
        renderer.pause();
    } else {
        renderer.play();
    }
}
