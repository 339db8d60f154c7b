//! # Editor Session
//!
//! Owns the live document and everything derived from it.
//!
//! ## Responsibilities
//! - **Document**: the live (edited) tree and the pristine copy from load.
//! - **Palette**: the extracted sites and groups, rebuilt after every write.
//! - **History**: undo/redo snapshots. The top snapshot always equals the live
//!   document once pending live edits have settled.
//! - **Gradient editing**: at most one open [`GradientSession`].
//! - **Renderer**: reloaded after every visible change.
//!
//! Replacing the document (load, undo, redo, reset) drops the open gradient
//! session and rebuilds the palette, since every recorded site path belongs to
//! the old tree.

use crate::codec::{json_number, normalize_hex};
use crate::coalesce::EditCoalescer;
use crate::compat::{check_header, CompatibilityReport};
use crate::errors::EditorError;
use crate::extract::Palette;
use crate::gradient::GradientSession;
use crate::history::History;
use crate::io::{self, DocumentFormat};
use crate::mutate::{apply_color, ColorTarget};
use crate::renderer::{reload, AnimationRenderer, NullRenderer};
use crate::theme::{self, Theme, ThemeColor};
use lottie_data::model::{LayerHeader, LottieHeader};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Canvas values editable from the settings dialog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

pub struct EditorSession<R: AnimationRenderer = NullRenderer> {
    document: Value,
    original: Value,
    palette: Palette,
    history: History,
    gradient: Option<GradientSession>,
    coalescer: EditCoalescer,
    renderer: R,
}

impl EditorSession<NullRenderer> {
    pub fn headless(document: Value) -> Self {
        Self::new(document, NullRenderer::default())
    }
}

impl<R: AnimationRenderer> EditorSession<R> {
    pub fn new(document: Value, renderer: R) -> Self {
        let mut history = History::new();
        history.reset(&document);
        let mut session = Self {
            palette: Palette::extract(&document),
            original: document.clone(),
            document,
            history,
            gradient: None,
            coalescer: EditCoalescer::default(),
            renderer,
        };
        session.renderer.load(&session.document);
        session
    }

    /// Parses `bytes` and opens a session on the result.
    pub fn open(bytes: &[u8], format: DocumentFormat, renderer: R) -> Result<Self, EditorError> {
        Ok(Self::new(io::load_document(bytes, format)?, renderer))
    }

    /// Replaces the document with a freshly loaded one. On error the current
    /// document, history and palette are untouched.
    #[instrument(level = "debug", skip(self, bytes))]
    pub fn load(&mut self, bytes: &[u8], format: DocumentFormat) -> Result<(), EditorError> {
        let document = io::load_document(bytes, format)?;
        self.original = document.clone();
        self.document = document;
        self.history.reset(&self.document);
        self.coalescer.take();
        self.gradient = None;
        self.palette = Palette::extract(&self.document);
        reload(&mut self.renderer, &self.document);
        Ok(())
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The document as it was loaded, before any edits.
    pub fn original(&self) -> &Value {
        &self.original
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn header(&self) -> Result<LottieHeader, EditorError> {
        Ok(LottieHeader::from_value(&self.document)?)
    }

    // --- Colors ---

    /// Recolors every site in the group keyed by `group_hex`. Returns the
    /// number of sites written.
    pub fn recolor_group(&mut self, group_hex: &str, new_hex: &str) -> Result<usize, EditorError> {
        let written = self.write_group(group_hex, new_hex)?;
        self.commit_change();
        Ok(written)
    }

    /// Recolors a single site from the ungrouped view.
    pub fn recolor_site(&mut self, index: usize, new_hex: &str) -> Result<bool, EditorError> {
        self.settle_now();
        let site = self
            .palette
            .site(index)
            .ok_or(EditorError::SiteNotFound(index))?;
        let written = apply_color(&mut self.document, ColorTarget::Site(site), new_hex)? > 0;
        self.commit_change();
        Ok(written)
    }

    /// Applies a color during a live drag. The document and palette update
    /// immediately; the snapshot and reload wait for [`Self::settle`].
    pub fn preview_group_color(
        &mut self,
        group_hex: &str,
        new_hex: &str,
        now: Instant,
    ) -> Result<usize, EditorError> {
        let key = normalize_hex(group_hex)?;
        let group = self
            .palette
            .group_mut(&key)
            .ok_or_else(|| EditorError::GroupNotFound(key.clone()))?;
        let written = apply_color(&mut self.document, ColorTarget::Group(group), new_hex)?;
        self.palette = Palette::extract(&self.document);
        self.coalescer.arm(now);
        Ok(written)
    }

    /// Snapshots and reloads if a live edit burst has been quiet for the
    /// debounce window. Returns whether it fired.
    pub fn settle(&mut self, now: Instant) -> bool {
        if self.coalescer.take_if_settled(now) {
            self.commit_change();
            true
        } else {
            false
        }
    }

    pub fn has_pending_edit(&self) -> bool {
        self.coalescer.is_pending()
    }

    /// Restores every color to the loaded document.
    pub fn reset_colors(&mut self) {
        self.settle_now();
        self.document = self.original.clone();
        self.gradient = None;
        self.commit_change();
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        self.settle_now();
        let changed = self.history.undo(&mut self.document);
        if changed {
            self.after_replace();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        self.settle_now();
        let changed = self.history.redo(&mut self.document);
        if changed {
            self.after_replace();
        }
        changed
    }

    // --- Themes ---

    pub fn capture_theme(&self) -> Vec<ThemeColor> {
        theme::capture(&self.palette)
    }

    /// Applies a saved theme positionally as one undoable step.
    pub fn apply_theme(&mut self, theme: &Theme) -> Result<usize, EditorError> {
        if self.palette.group_count() == 0 {
            return Err(EditorError::invalid_input("animation has no editable colors"));
        }
        self.settle_now();
        self.history.snapshot(&self.document);
        let written = theme::apply(&mut self.document, &mut self.palette, &theme.colors)?;
        self.commit_change();
        Ok(written)
    }

    // --- Gradients ---

    pub fn open_gradient(&mut self, group_hex: &str) -> Result<&mut GradientSession, EditorError> {
        self.settle_now();
        let key = normalize_hex(group_hex)?;
        let group = self
            .palette
            .group(&key)
            .ok_or_else(|| EditorError::GroupNotFound(key.clone()))?;
        let session = GradientSession::open(&self.document, group)?;
        Ok(self.gradient.insert(session))
    }

    pub fn gradient(&mut self) -> Option<&mut GradientSession> {
        self.gradient.as_mut()
    }

    /// Writes the open gradient session into the document.
    pub fn commit_gradient(&mut self) -> Result<(), EditorError> {
        let session = self
            .gradient
            .take()
            .ok_or_else(|| EditorError::invalid_input("no gradient editor is open"))?;
        session.commit(&mut self.document)?;
        self.commit_change();
        Ok(())
    }

    /// Closes the gradient editor without writing anything.
    pub fn discard_gradient(&mut self) -> bool {
        self.gradient.take().is_some()
    }

    // --- Layers & canvas ---

    pub fn layers(&self) -> Result<Vec<LayerHeader>, EditorError> {
        Ok(self.header()?.layers)
    }

    /// Display name for a layer: its `nm`, or `Layer {index}`.
    pub fn layer_name(&self, index: usize) -> Option<String> {
        let layer = self.document.get("layers")?.get(index)?;
        Some(
            layer
                .get("nm")
                .and_then(Value::as_str)
                .map_or_else(|| format!("Layer {index}"), str::to_string),
        )
    }

    pub fn rename_layer(&mut self, index: usize, name: &str) -> Result<(), EditorError> {
        self.settle_now();
        let layer = self.layer_mut(index)?;
        layer.insert("nm".to_string(), name.into());
        self.commit_change();
        Ok(())
    }

    pub fn set_layer_visible(&mut self, index: usize, visible: bool) -> Result<(), EditorError> {
        self.settle_now();
        let layer = self.layer_mut(index)?;
        layer.insert("hd".to_string(), (!visible).into());
        self.commit_change();
        Ok(())
    }

    /// Updates `w`, `h` and `fr`. Returns false (and records nothing) when the
    /// values already match.
    pub fn apply_settings(&mut self, settings: CanvasSettings) -> Result<bool, EditorError> {
        let CanvasSettings {
            width,
            height,
            frame_rate,
        } = settings;
        if width == 0 || height == 0 || !frame_rate.is_finite() || frame_rate <= 0.0 {
            warn!(?settings, "rejected canvas settings");
            return Err(EditorError::invalid_input(
                "width, height and frame rate must be positive numbers",
            ));
        }

        let current = (
            self.document.get("w").and_then(Value::as_f64),
            self.document.get("h").and_then(Value::as_f64),
            self.document.get("fr").and_then(Value::as_f64),
        );
        if current == (Some(width as f64), Some(height as f64), Some(frame_rate)) {
            return Ok(false);
        }

        self.settle_now();
        let Value::Object(root) = &mut self.document else {
            return Err(EditorError::invalid_input("animation document must be a JSON object"));
        };
        root.insert("w".to_string(), width.into());
        root.insert("h".to_string(), height.into());
        root.insert("fr".to_string(), json_number(frame_rate));
        self.commit_change();
        Ok(true)
    }

    pub fn check_compatibility(&self) -> Result<CompatibilityReport, EditorError> {
        Ok(check_header(&self.header()?))
    }

    // --- Export ---

    pub fn export_json(&self) -> Result<String, EditorError> {
        io::export_json(&self.document)
    }

    pub fn export_tgs(&self) -> Result<Vec<u8>, EditorError> {
        io::export_tgs(&self.original, &self.document)
    }

    // --- Internals ---

    fn write_group(&mut self, group_hex: &str, new_hex: &str) -> Result<usize, EditorError> {
        self.settle_now();
        let key = normalize_hex(group_hex)?;
        let group = self
            .palette
            .group_mut(&key)
            .ok_or(EditorError::GroupNotFound(key))?;
        Ok(apply_color(&mut self.document, ColorTarget::Group(group), new_hex)?)
    }

    fn layer_mut(&mut self, index: usize) -> Result<&mut serde_json::Map<String, Value>, EditorError> {
        self.document
            .get_mut("layers")
            .and_then(|layers| layers.get_mut(index))
            .and_then(Value::as_object_mut)
            .ok_or(EditorError::LayerOutOfRange(index))
    }

    /// Records a pending live edit before another operation runs.
    fn settle_now(&mut self) {
        if self.coalescer.take() {
            self.history.snapshot(&self.document);
            reload(&mut self.renderer, &self.document);
        }
    }

    fn commit_change(&mut self) {
        self.history.snapshot(&self.document);
        self.palette = Palette::extract(&self.document);
        reload(&mut self.renderer, &self.document);
        debug!(
            undo = self.history.undo_len(),
            groups = self.palette.group_count(),
            "committed change"
        );
    }

    fn after_replace(&mut self) {
        self.gradient = None;
        self.palette = Palette::extract(&self.document);
        reload(&mut self.renderer, &self.document);
    }
}
