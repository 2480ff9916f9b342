use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::atlas::GlyphAtlas;
use crate::error::PaletteError;
use crate::format::{FontDef, FontKey};
use crate::palette::Palette;

// ── AtlasCache ────────────────────────────────────────────────────────────────

/// Memoises [`GlyphAtlas`] construction per `(font identity, palette)`.
///
/// Atlases are never mutated after they are published, so handing out
/// `Arc` clones is all readers need.  The mutex only serialises the
/// fetch-or-build step; a miss builds while holding it so that one key is
/// never built twice.
#[derive(Default)]
pub struct AtlasCache {
    atlases: Mutex<HashMap<FontKey, HashMap<Palette, Arc<GlyphAtlas>>>>,
}

impl AtlasCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by [`build_atlas`].
    pub fn global() -> &'static AtlasCache {
        static GLOBAL: OnceLock<AtlasCache> = OnceLock::new();
        GLOBAL.get_or_init(AtlasCache::new)
    }

    pub fn get_or_build(
        &self,
        font: &FontDef,
        palette: &Palette,
    ) -> Result<Arc<GlyphAtlas>, PaletteError> {
        let key = font.key();
        let mut atlases = self.atlases.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(atlas) = atlases.get(&key).and_then(|by_palette| by_palette.get(palette)) {
            return Ok(Arc::clone(atlas));
        }

        tracing::debug!("building atlas for font {:?} with {} colors", key, palette.len());
        let atlas = Arc::new(GlyphAtlas::build(font, palette)?);
        atlases.entry(key).or_default().insert(palette.clone(), Arc::clone(&atlas));
        Ok(atlas)
    }

    /// Number of cached atlases.
    pub fn len(&self) -> usize {
        let atlases = self.atlases.lock().unwrap_or_else(PoisonError::into_inner);
        atlases.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.atlases.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Fetch or build the atlas for `(font, palette)` from the global cache.
pub fn build_atlas(font: &FontDef, palette: &Palette) -> Result<Arc<GlyphAtlas>, PaletteError> {
    AtlasCache::global().get_or_build(font, palette)
}
