//! Decoder and text engine for the 8-font LBX bitmap font containers.
//!
//! Raw bytes go through [`decode_container`], glyph run streams through
//! [`glyph::rasterize`], bitmaps through [`palette::colorize`] into a
//! [`GlyphAtlas`] (cached per font and palette by [`build_atlas`]), and text
//! is measured, wrapped and drawn on top of that atlas.

pub mod error;
pub mod fonts;
pub mod format;
pub mod glyph;
pub mod palette;
pub mod renderer;

pub use error::{DecodeError, PaletteError, PartialGlyph, RasterError, RegistryError};
pub use fonts::{FontRegistry, FontSpec};
pub use format::{
    ContainerHeader, FONT_COUNT, FontContainer, FontDef, FontKey, GLYPH_COUNT, GlyphDef,
    decode_container, decode_font,
};
pub use glyph::GlyphBitmap;
pub use palette::{Palette, Rgba8, colorize};
pub use renderer::{
    AtlasCache, BlitTarget, ColorScale, FontMetrics, FontOptions, GlyphAtlas, GlyphQuad,
    GlyphRect, Justify, Overflow, WrapOptions, WrappedText, build_atlas, layout_text,
    measure_width, print_wrap, render_text, render_wrapped, wrap_text, wrap_text_with,
};
