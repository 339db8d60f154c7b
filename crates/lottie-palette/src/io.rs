//! # Document I/O
//!
//! Loading plain and gzip-compressed (`.tgs`) animations, and exporting them.
//!
//! ## Responsibilities
//! - **Load**: all-or-nothing parse; a failed load never yields a partial document.
//! - **JSON export**: pretty-printed live document.
//! - **TGS export**: the *original* document with only the edited color
//!   properties copied over, flagged with `"tgs": 1` and gzip-compressed.

use crate::errors::EditorError;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use lottie_data::model::{COLOR_KEYS, GRADIENT_KEY, STOP_COUNT_KEY, VALUE_KEY};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::Path;
use tracing::instrument;

/// Top-level marker the sticker channel expects on compressed exports.
pub const TGS_FLAG_KEY: &str = "tgs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Tgs,
}

impl DocumentFormat {
    /// `.tgs` (any case) is compressed; anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tgs") => DocumentFormat::Tgs,
            _ => DocumentFormat::Json,
        }
    }
}

pub fn decompress(bytes: &[u8]) -> Result<String, EditorError> {
    let mut text = String::new();
    GzDecoder::new(bytes)
        .read_to_string(&mut text)
        .map_err(EditorError::Decompress)?;
    Ok(text)
}

pub fn compress(text: &str) -> Result<Vec<u8>, EditorError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    Ok(encoder.finish()?)
}

#[instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
pub fn load_document(bytes: &[u8], format: DocumentFormat) -> Result<Value, EditorError> {
    let document: Value = match format {
        DocumentFormat::Json => serde_json::from_slice(bytes)?,
        DocumentFormat::Tgs => serde_json::from_str(&decompress(bytes)?)?,
    };
    if !document.is_object() {
        return Err(EditorError::invalid_input(
            "animation document must be a JSON object",
        ));
    }
    Ok(document)
}

pub fn export_json(document: &Value) -> Result<String, EditorError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Copies the value field of every color property from `edited` onto the
/// matching property of `target`, recursing wherever both trees have the same
/// shape. Gradients also carry their stop count, which must stay paired with
/// the stop array. Nothing else in `target` changes.
pub fn overlay_colors(edited: &Value, target: &mut Value) {
    match (edited, target) {
        (Value::Object(src), Value::Object(tgt)) => {
            for key in COLOR_KEYS {
                let Some(edited_prop) = src.get(key) else {
                    continue;
                };
                let Some(Value::Object(prop)) = tgt.get_mut(key) else {
                    continue;
                };
                let Some(slot) = prop.get_mut(VALUE_KEY) else {
                    continue;
                };
                let Some(value) = edited_prop.get(VALUE_KEY) else {
                    continue;
                };
                *slot = value.clone();
                if key == GRADIENT_KEY {
                    if let Some(count) = edited_prop.get(STOP_COUNT_KEY) {
                        prop.insert(STOP_COUNT_KEY.to_string(), count.clone());
                    }
                }
            }
            for (key, child) in src {
                if COLOR_KEYS.contains(&key.as_str()) {
                    continue;
                }
                if let Some(target_child) = tgt.get_mut(key) {
                    overlay_colors(child, target_child);
                }
            }
        }
        (Value::Array(src), Value::Array(tgt)) => {
            for (child, target_child) in src.iter().zip(tgt.iter_mut()) {
                overlay_colors(child, target_child);
            }
        }
        _ => {}
    }
}

/// Builds the compressed sticker export from the original and live documents.
#[instrument(level = "debug", skip_all)]
pub fn export_tgs(original: &Value, edited: &Value) -> Result<Vec<u8>, EditorError> {
    let mut export = original.clone();
    overlay_colors(edited, &mut export);
    if let Value::Object(map) = &mut export {
        map.insert(TGS_FLAG_KEY.to_string(), 1.into());
    }
    compress(&serde_json::to_string(&export)?)
}
