use bytemuck::{Pod, Zeroable};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::PaletteError;
use crate::format::GlyphDef;
use crate::glyph::GlyphBitmap;

// ── Rgba8 ─────────────────────────────────────────────────────────────────────

/// One straight-alpha palette color.  Serialised as `[r, g, b, a]`.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::new(0, 0, 0, 0xff);
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }

    /// Scale the color channels by alpha, for translucent palette entries.
    pub fn premultiplied(self) -> Self {
        let a = self.a as f32 / 255.0;
        Self {
            r: (self.r as f32 * a) as u8,
            g: (self.g as f32 * a) as u8,
            b: (self.b as f32 * a) as u8,
            a: self.a,
        }
    }

    /// Channels normalised to `0.0..=1.0`.
    pub fn to_f32(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| c as f32 / 255.0)
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(c: Rgba8) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

// ── Palette ───────────────────────────────────────────────────────────────────

/// Ordered colors indexed by glyph bitmap values.
///
/// Entries `0` and `1` are conventionally transparent; `2..` are the
/// foreground tones.  Rendering the same font with different palettes gives
/// differently colored text without decoding it again.
///
/// Colors are premultiplied by alpha, and so are the atlases built from them.
/// Translucent entries written as straight colors go through
/// [`Rgba8::premultiplied`] first (the registry's `premultiply` flag).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(pub Vec<Rgba8>);

impl Palette {
    pub fn new(colors: impl Into<Vec<Rgba8>>) -> Self {
        Self(colors.into())
    }

    /// Two transparent background entries followed by `count` copies of
    /// `color`, the usual shape of a flat single-color text palette.
    pub fn solid(color: Rgba8, count: usize) -> Self {
        let mut colors = vec![Rgba8::TRANSPARENT; 2];
        colors.extend(std::iter::repeat_n(color, count));
        Self(colors)
    }

    /// The grey ramp fonts use when no palette is supplied.
    pub fn default_font() -> Self {
        Self(DEFAULT_FONT_COLORS.to_vec())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<Rgba8> {
        self.0.get(index as usize).copied()
    }
}

const DEFAULT_FONT_COLORS: [Rgba8; 20] = [
    Rgba8::rgb(0x00, 0x00, 0x00),
    Rgba8::rgb(0x08, 0x04, 0x04),
    Rgba8::rgb(0x24, 0x1c, 0x18),
    Rgba8::rgb(0x38, 0x30, 0x2c),
    Rgba8::rgb(0x48, 0x40, 0x3c),
    Rgba8::rgb(0x58, 0x50, 0x4c),
    Rgba8::rgb(0x68, 0x60, 0x5c),
    Rgba8::rgb(0x7c, 0x74, 0x70),
    Rgba8::rgb(0x8c, 0x84, 0x80),
    Rgba8::rgb(0x9c, 0x94, 0x90),
    Rgba8::rgb(0xac, 0xa4, 0xa0),
    Rgba8::rgb(0xc0, 0xb8, 0xb4),
    Rgba8::rgb(0xd0, 0xc8, 0xc4),
    Rgba8::rgb(0xe0, 0xd8, 0xd4),
    Rgba8::rgb(0xf0, 0xe8, 0xe4),
    Rgba8::rgb(0xfc, 0xfc, 0xfc),
    Rgba8::rgb(0x38, 0x20, 0x1c),
    Rgba8::rgb(0x40, 0x2c, 0x24),
    Rgba8::rgb(0x48, 0x34, 0x2c),
    Rgba8::rgb(0x50, 0x3c, 0x30),
];

// ── colorize ──────────────────────────────────────────────────────────────────

/// Map every index of `bitmap` through `palette`.
///
/// Fails with [`PaletteError::PaletteIndexOutOfRange`] on the first index the
/// palette does not cover; no partial image is returned.
pub fn colorize(bitmap: &GlyphBitmap, palette: &Palette) -> Result<RgbaImage, PaletteError> {
    let pixels = bitmap
        .pixels()
        .iter()
        .map(|&index| {
            palette.get(index).ok_or(PaletteError::PaletteIndexOutOfRange {
                index,
                len: palette.len(),
            })
        })
        .collect::<Result<Vec<Rgba8>, _>>()?;

    let mut image = RgbaImage::new(bitmap.width(), bitmap.height());
    image.copy_from_slice(bytemuck::cast_slice(&pixels));
    Ok(image)
}

impl GlyphDef {
    /// Decode and colorize with [`Palette::default_font`].
    pub fn make_image(&self) -> Result<Option<RgbaImage>, PaletteError> {
        self.make_image_with_palette(&Palette::default_font())
    }

    /// Decode and colorize; `Ok(None)` for empty glyphs.
    pub fn make_image_with_palette(
        &self,
        palette: &Palette,
    ) -> Result<Option<RgbaImage>, PaletteError> {
        self.rasterize()
            .map(|bitmap| colorize(&bitmap, palette))
            .transpose()
    }
}
