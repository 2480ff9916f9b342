pub mod atlas;
pub mod cache;
pub mod draw;
pub mod text;

pub use atlas::{GlyphAtlas, GlyphRect};
pub use cache::{AtlasCache, build_atlas};
pub use draw::{
    BlitTarget, ColorScale, FontOptions, GlyphQuad, Justify, layout_text, print_wrap,
    render_text, render_wrapped,
};
pub use text::{
    FontMetrics, LINE_BREAK, Overflow, WrapOptions, WrappedText, measure_width, wrap_text,
    wrap_text_with,
};
