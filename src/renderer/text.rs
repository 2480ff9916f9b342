use crate::format::FontDef;

use super::atlas::GlyphAtlas;

// ── FontMetrics ───────────────────────────────────────────────────────────────

/// The metrics measuring and wrapping need.  Implemented by both the raw
/// [`FontDef`] and a built [`GlyphAtlas`], so layout can run before or after
/// an atlas exists.
pub trait FontMetrics {
    /// Glyph height in pixels.
    fn line_height(&self) -> u32;
    /// Pixels added after every glyph.
    fn horizontal_spacing(&self) -> u32;
    /// Pixels added between explicit lines.
    fn vertical_spacing(&self) -> u32;
    /// Width of the glyph for `ch`; `None` when `ch` is outside 32..=127.
    fn glyph_width(&self, ch: char) -> Option<u32>;
}

impl FontMetrics for FontDef {
    fn line_height(&self) -> u32 {
        self.height()
    }

    fn horizontal_spacing(&self) -> u32 {
        FontDef::horizontal_spacing(self)
    }

    fn vertical_spacing(&self) -> u32 {
        FontDef::vertical_spacing(self)
    }

    fn glyph_width(&self, ch: char) -> Option<u32> {
        self.glyph_for_char(ch).map(|g| g.width)
    }
}

impl FontMetrics for GlyphAtlas {
    fn line_height(&self) -> u32 {
        self.tile_h
    }

    fn horizontal_spacing(&self) -> u32 {
        self.horizontal_spacing
    }

    fn vertical_spacing(&self) -> u32 {
        self.vertical_spacing
    }

    fn glyph_width(&self, ch: char) -> Option<u32> {
        self.width_of(ch)
    }
}

// ── measure_width ─────────────────────────────────────────────────────────────

/// Horizontal advance of `ch` in unscaled pixels, spacing included.
/// Newlines and unrepresentable characters advance by zero.
pub(crate) fn advance<F: FontMetrics + ?Sized>(font: &F, ch: char) -> u32 {
    if ch == '\n' {
        return 0;
    }
    font.glyph_width(ch)
        .map_or(0, |w| w + font.horizontal_spacing())
}

/// Pixel width of `text` at `scale`.
///
/// Every representable character contributes `(width + horizontal_spacing) ×
/// scale`, including the last one, so the result carries one trailing
/// spacing.  Characters outside 32..=127 contribute nothing.
pub fn measure_width<F: FontMetrics + ?Sized>(font: &F, text: &str, scale: f32) -> f32 {
    let total: u32 = text.chars().map(|ch| advance(font, ch)).sum();
    total as f32 * scale
}

// ── Wrapping ──────────────────────────────────────────────────────────────────

/// Internal paragraph separator.  Newlines are normalised to it before
/// wrapping; text that already carries it (help entries do) splits the same.
pub const LINE_BREAK: char = '\u{14}';

/// What [`wrap_text_with`] does when a paragraph's first word alone is at
/// least `max_width` wide.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    /// Stop wrapping the paragraph and drop its remaining text.
    #[default]
    Drop,
    /// Emit the word as its own over-width line and keep going.
    Emit,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WrapOptions {
    pub overflow: Overflow,
}

/// Text broken into lines that fit a maximum width.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WrappedText {
    pub lines: Vec<String>,
    /// Sum of `line_height × scale + 1` over all lines.
    pub total_height: f32,
    /// Scale the lines were measured at.
    pub scale: f32,
}

/// Word-wrap `text` so every line measures strictly less than `max_width`,
/// using the default [`WrapOptions`].
pub fn wrap_text<F: FontMetrics + ?Sized>(
    font: &F,
    text: &str,
    max_width: f32,
    scale: f32,
) -> WrappedText {
    wrap_text_with(font, text, max_width, scale, WrapOptions::default())
}

/// Word-wrap `text`.
///
/// Each paragraph is emitted whole when it fits.  Otherwise the longest run
/// of leading words that measures under `max_width` becomes a line and the
/// rest is wrapped again.
pub fn wrap_text_with<F: FontMetrics + ?Sized>(
    font: &F,
    text: &str,
    max_width: f32,
    scale: f32,
    options: WrapOptions,
) -> WrappedText {
    let line_advance = font.line_height() as f32 * scale + 1.0;
    let normalised = text.replace("\r\n", "\n").replace('\n', &LINE_BREAK.to_string());

    let mut wrapped = WrappedText { lines: Vec::new(), total_height: 0.0, scale };
    let mut push = |line: String| {
        wrapped.lines.push(line);
        wrapped.total_height += line_advance;
    };

    for paragraph in normalised.split(LINE_BREAK) {
        let mut remaining = paragraph.to_string();
        loop {
            if measure_width(font, &remaining, scale) < max_width {
                push(remaining);
                break;
            }

            let words: Vec<&str> = remaining.split(' ').collect();
            let fit = (1..=words.len())
                .rev()
                .find(|&i| measure_width(font, &words[..i].join(" "), scale) < max_width);

            let take = match (fit, options.overflow) {
                (Some(i), _) => i,
                (None, Overflow::Emit) => 1,
                (None, Overflow::Drop) => break,
            };

            push(words[..take].join(" "));
            if take == words.len() {
                break;
            }
            remaining = words[take..].join(" ");
        }
    }

    wrapped
}
