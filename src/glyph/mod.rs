pub mod raster;

pub use raster::rasterize;

// ── GlyphBitmap ───────────────────────────────────────────────────────────────

/// A decoded glyph: a `width × height` grid of palette indices.
///
/// Index `0` is background (never painted by the run stream); painted pixels
/// hold `color nibble + 1`, so values range over `0..=16`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlyphBitmap {
    width: u32,
    height: u32,
    /// Row-major palette indices.
    pixels: Vec<u8>,
}

impl GlyphBitmap {
    /// An all-background bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Palette index at (`x`, `y`), or `None` outside the bitmap.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Writes outside the bitmap are ignored.
    pub(crate) fn set(&mut self, x: u32, y: u32, index: u8) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = index;
        }
    }

    /// Largest palette index used, `0` for a blank bitmap.
    pub fn max_index(&self) -> u8 {
        self.pixels.iter().copied().max().unwrap_or(0)
    }
}
