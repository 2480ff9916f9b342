//! Named fonts: a JSON-configured mapping from a UI font name to a container
//! slot and the palette it is drawn with.
//!
//! ```json
//! {
//!     "fonts": {
//!         "NormalFont": { "font": 1, "palette": [[0,0,0,0], [0,0,0,0], [225,225,225,255]] },
//!         "SmallFont":  { "font": 0, "palette": [[0,0,0,0], [0,0,0,0], [255,255,255,80]],
//!                         "premultiply": true }
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::RegistryError;
use crate::format::FontContainer;
use crate::palette::Palette;
use crate::renderer::{AtlasCache, GlyphAtlas};

// ── FontSpec ──────────────────────────────────────────────────────────────────

/// One registry entry, with any premultiplication already applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSpec {
    /// Slot in the container, `0..8`.
    pub font: usize,
    pub palette: Palette,
}

// ── FontRegistry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct FontRegistry {
    fonts: HashMap<String, FontSpec>,
}

impl FontRegistry {
    /// Deserialise a registry from JSON (format in the module docs).
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawRegistry = serde_json::from_str(json)?;

        let fonts = raw
            .fonts
            .into_iter()
            .map(|(name, entry)| {
                let palette = if entry.premultiply {
                    Palette::new(
                        entry.palette.0.iter().map(|c| c.premultiplied()).collect::<Vec<_>>(),
                    )
                } else {
                    entry.palette
                };
                (name, FontSpec { font: entry.font, palette })
            })
            .collect();

        Ok(Self { fonts })
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: FontSpec) {
        self.fonts.insert(name.into(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&FontSpec> {
        self.fonts.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Atlas for font `name` from the global cache.
    pub fn load(
        &self,
        container: &FontContainer,
        name: &str,
    ) -> Result<Arc<GlyphAtlas>, RegistryError> {
        self.load_in(AtlasCache::global(), container, name)
    }

    /// Atlas for font `name`, built in (or fetched from) `cache`.
    pub fn load_in(
        &self,
        cache: &AtlasCache,
        container: &FontContainer,
        name: &str,
    ) -> Result<Arc<GlyphAtlas>, RegistryError> {
        let spec = self
            .fonts
            .get(name)
            .ok_or_else(|| RegistryError::UnknownFont(name.to_string()))?;
        let font = container.font(spec.font).ok_or_else(|| RegistryError::InvalidFontIndex {
            name: name.to_string(),
            index: spec.font,
        })?;
        Ok(cache.get_or_build(font, &spec.palette)?)
    }
}

// ── Raw (JSON-facing) types ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawRegistry {
    fonts: HashMap<String, RawFontEntry>,
}

#[derive(Deserialize)]
struct RawFontEntry {
    /// Container slot; range-checked when loading.
    font: usize,
    palette: Palette,
    #[serde(default)]
    premultiply: bool,
}
