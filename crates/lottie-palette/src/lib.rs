//! # Lottie Palette
//!
//! `lottie-palette` finds every editable color in a Lottie animation, groups
//! identical colors, and writes new colors back without touching anything else
//! in the document.
//!
//! The document stays an untyped `serde_json::Value` throughout. Only the
//! header fields are read through typed structs (see `lottie_data::model`).
//!
//! ## Core Features
//!
//! *   **Extraction**: solid colors (`c`, `sc`) and gradient color stops (`g`),
//!     static or keyframed, each recorded with a path back to its slot.
//! *   **Grouping**: sites sharing a hex value are edited together.
//! *   **Gradient editing**: add, remove, move, recolor and reverse stops.
//! *   **History**: bounded undo/redo of whole-document snapshots.
//! *   **Themes**: capture the group colors and re-apply them positionally.
//! *   **Compatibility**: sticker constraints (512x512, 60 fps, 3 s).
//! *   **Export**: pretty JSON, or gzip-compressed TGS.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lottie_palette::{DocumentFormat, EditorSession, NullRenderer};
//!
//! # fn main() -> Result<(), lottie_palette::EditorError> {
//! let bytes = std::fs::read("sticker.tgs")?;
//! let mut session = EditorSession::open(&bytes, DocumentFormat::Tgs, NullRenderer::default())?;
//! session.recolor_group("#ff0000", "#3366ff")?;
//! std::fs::write("sticker-blue.tgs", session.export_tgs()?)?;
//! # Ok(())
//! # }
//! ```

/// Hex and normalized RGB conversions.
pub mod codec;

/// Addresses of nodes inside a document.
pub mod path;

/// The three ways a color array is laid out inside a property.
pub mod encoding;

/// Color-site extraction and grouping.
pub mod extract;

/// Writing colors back into the document.
pub mod mutate;

/// Gradient stop editing.
pub mod gradient;

/// Undo/redo snapshots.
pub mod history;

/// Saved color themes.
pub mod theme;

pub mod store;

/// Sticker format checks.
pub mod compat;

/// Loading and exporting documents.
pub mod io;

pub mod renderer;
pub mod coalesce;

/// The editor session that ties the pieces together.
pub mod session;

pub mod errors;

pub use compat::{CompatibilityReport, MAX_DURATION_SECONDS, TARGET_FRAME_RATE, TARGET_SIZE};
pub use errors::{ColorError, EditorError};
pub use extract::{ColorFilter, ColorGroup, ColorSite, Palette, ShapeKind};
pub use gradient::{GradientSession, GradientStop};
pub use history::{History, MAX_HISTORY};
pub use io::DocumentFormat;
pub use renderer::{AnimationRenderer, NullRenderer};
pub use session::{CanvasSettings, EditorSession};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use theme::{Theme, ThemeColor, ThemeLibrary};
