//! # Lottie Recolor
//!
//! `lottie-recolor` finds the colors of a Lottie or TGS sticker animation and
//! rewrites them in place.
//!
//! The work happens in [`lottie_palette`]; the typed header view lives in
//! [`lottie_data`]. This crate re-exports both and adds file helpers.

pub use lottie_data as data;
pub use lottie_palette::*;

use std::path::Path;

/// Reads an animation from disk. `.tgs` files are decompressed first.
pub fn open_file(path: impl AsRef<Path>) -> Result<EditorSession, EditorError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    EditorSession::open(&bytes, DocumentFormat::from_path(path), NullRenderer::default())
}

/// Writes the live document: compressed sticker export for `.tgs`, pretty
/// JSON otherwise.
pub fn save_file(session: &EditorSession, path: impl AsRef<Path>) -> Result<(), EditorError> {
    let path = path.as_ref();
    let bytes = match DocumentFormat::from_path(path) {
        DocumentFormat::Tgs => session.export_tgs()?,
        DocumentFormat::Json => session.export_json()?.into_bytes(),
    };
    std::fs::write(path, bytes)?;
    Ok(())
}
