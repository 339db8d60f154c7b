//! # Themes
//!
//! A theme is the ordered list of group colors captured from a document.
//!
//! Applying a theme is positional: theme color `i` goes onto the document's
//! group `i`, in current first-seen group order. Nothing matches colors by
//! similarity, so a theme captured from a differently ordered document can put
//! a saved color on an unrelated region.

use crate::codec::normalize_hex;
use crate::errors::EditorError;
use crate::extract::Palette;
use crate::mutate::{apply_color, ColorTarget};
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Key the theme list is stored under.
pub const THEME_STORE_KEY: &str = "lottieThemes";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColor {
    pub hex: String,
    #[serde(rename = "count", alias = "usageCount", default)]
    pub usage_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: u64,
    pub name: String,
    #[serde(rename = "date", alias = "createdAt", default)]
    pub created_at: String,
    pub colors: Vec<ThemeColor>,
}

/// The current groups as theme colors, in group order.
pub fn capture(palette: &Palette) -> Vec<ThemeColor> {
    palette
        .groups()
        .map(|group| ThemeColor {
            hex: group.hex.clone(),
            usage_count: group.usage_count(),
        })
        .collect()
}

/// Writes `colors[i]` onto group `i` for every index both lists share.
///
/// All theme colors are validated before anything is written. Returns the
/// number of sites written; the palette is stale afterwards.
pub fn apply(document: &mut Value, palette: &mut Palette, colors: &[ThemeColor]) -> Result<usize, EditorError> {
    let hexes = colors
        .iter()
        .map(|color| normalize_hex(&color.hex))
        .collect::<Result<Vec<_>, _>>()?;

    let mut written = 0;
    for (group, hex) in palette.groups_mut().zip(&hexes) {
        written += apply_color(document, ColorTarget::Group(group), hex)?;
    }
    debug!(colors = hexes.len(), written, "applied theme");
    Ok(written)
}

/// Saved themes, persisted as one JSON list under [`THEME_STORE_KEY`].
///
/// The list is read once when the library is opened and rewritten in full on
/// every change.
pub struct ThemeLibrary<S: KeyValueStore> {
    store: S,
    themes: Vec<Theme>,
}

impl<S: KeyValueStore> ThemeLibrary<S> {
    pub fn open(store: S) -> Result<Self, EditorError> {
        let themes = match store.get(THEME_STORE_KEY)? {
            Some(text) => serde_json::from_str(&text)?,
            None => Vec::new(),
        };
        Ok(Self { store, themes })
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn get(&self, id: u64) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Saves a new theme. Ids are creation timestamps in milliseconds, bumped
    /// when needed so they stay unique.
    pub fn add(&mut self, name: &str, colors: Vec<ThemeColor>) -> Result<&Theme, EditorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::invalid_input("theme name is empty"));
        }
        if colors.is_empty() {
            return Err(EditorError::invalid_input("no colors detected to save"));
        }

        let now = chrono::Utc::now();
        let newest = self.themes.iter().map(|theme| theme.id).max();
        let id = match newest {
            Some(newest) => (now.timestamp_millis().max(0) as u64).max(newest + 1),
            None => now.timestamp_millis().max(0) as u64,
        };

        self.themes.push(Theme {
            id,
            name: name.to_string(),
            created_at: now.to_rfc3339(),
            colors,
        });
        self.persist()?;
        Ok(&self.themes[self.themes.len() - 1])
    }

    pub fn delete(&mut self, id: u64) -> Result<Theme, EditorError> {
        let index = self
            .themes
            .iter()
            .position(|theme| theme.id == id)
            .ok_or(EditorError::ThemeNotFound(id))?;
        let theme = self.themes.remove(index);
        if let Err(e) = self.persist() {
            warn!("failed to persist theme deletion: {e}");
            self.themes.insert(index, theme);
            return Err(e);
        }
        Ok(theme)
    }

    fn persist(&mut self) -> Result<(), EditorError> {
        let text = serde_json::to_string(&self.themes)?;
        self.store.set(THEME_STORE_KEY, &text)
    }
}
