use image::RgbaImage;

use crate::error::PaletteError;
use crate::format::{FontDef, FontKey, GLYPH_COUNT, glyph_index};
use crate::palette::{Palette, colorize};

// ── GlyphRect ─────────────────────────────────────────────────────────────────

/// Pixel rectangle of one glyph inside the atlas image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GlyphRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

// ── GlyphAtlas ────────────────────────────────────────────────────────────────

/// Every glyph of one font, colorized with one palette and packed into a
/// single image on a near-square grid.
///
/// The grid has `cols = ceil(sqrt(96))` columns and `rows = ceil(96 / cols)`
/// rows of `tile_w × tile_h` cells, where `tile_w` is the widest glyph and
/// `tile_h` the font height.  Glyph `i` lives in cell `i` in row-major order,
/// anchored at the cell's top-left corner.  Immutable once built.
#[derive(Clone, Debug)]
pub struct GlyphAtlas {
    font: FontKey,
    palette: Palette,
    image: RgbaImage,
    pub cols: u32,
    pub rows: u32,
    pub tile_w: u32,
    pub tile_h: u32,
    pub horizontal_spacing: u32,
    pub vertical_spacing: u32,
    widths: [u32; GLYPH_COUNT],
}

impl GlyphAtlas {
    /// Rasterize, colorize and pack all glyphs of `font`.
    ///
    /// Fails if any glyph uses a palette index that `palette` does not cover.
    pub fn build(font: &FontDef, palette: &Palette) -> Result<Self, PaletteError> {
        let count = font.glyph_count() as u32;
        let tile_w = font.max_glyph_width();
        let tile_h = font.height();
        let cols = (count as f64).sqrt().ceil() as u32;
        let rows = count.div_ceil(cols.max(1));

        let mut image = RgbaImage::new(cols * tile_w, rows * tile_h);
        for (index, glyph) in font.glyphs().iter().enumerate() {
            let Some(bitmap) = glyph.rasterize() else {
                continue;
            };
            let colored = colorize(&bitmap, palette)?;
            let (x, y) = cell_origin(index as u32, cols, tile_w, tile_h);
            image::imageops::replace(&mut image, &colored, x as i64, y as i64);
        }

        Ok(Self {
            font: font.key(),
            palette: palette.clone(),
            image,
            cols,
            rows,
            tile_w,
            tile_h,
            horizontal_spacing: font.horizontal_spacing(),
            vertical_spacing: font.vertical_spacing(),
            widths: std::array::from_fn(|i| font.glyphs()[i].width),
        })
    }

    pub fn font_key(&self) -> FontKey {
        self.font
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Atlas region of `ch`, or `None` for unrepresentable or empty glyphs.
    pub fn region(&self, ch: char) -> Option<GlyphRect> {
        let index = glyph_index(ch)?;
        let width = self.widths[index];
        if width == 0 {
            return None;
        }
        let (x, y) = cell_origin(index as u32, self.cols, self.tile_w, self.tile_h);
        Some(GlyphRect { x, y, width, height: self.tile_h })
    }

    /// Normalised texture coordinates of the glyph for `ch`, trimmed to the
    /// glyph's own width rather than the full cell.
    pub fn uv_for_char(&self, ch: char) -> Option<([f32; 2], [f32; 2])> {
        let rect = self.region(ch)?;
        let total_w = self.image.width() as f32;
        let total_h = self.image.height() as f32;
        Some((
            [rect.x as f32 / total_w, rect.y as f32 / total_h],
            [
                (rect.x + rect.width) as f32 / total_w,
                (rect.y + rect.height) as f32 / total_h,
            ],
        ))
    }

    pub(crate) fn width_of(&self, ch: char) -> Option<u32> {
        glyph_index(ch).map(|i| self.widths[i])
    }
}

fn cell_origin(index: u32, cols: u32, tile_w: u32, tile_h: u32) -> (u32, u32) {
    ((index % cols) * tile_w, (index / cols) * tile_h)
}
