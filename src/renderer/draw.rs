use glam::Vec2;
use image::RgbaImage;

use super::atlas::{GlyphAtlas, GlyphRect};
use super::text::{FontMetrics, WrappedText, advance, measure_width, wrap_text};
use crate::palette::Rgba8;

// ── ColorScale ────────────────────────────────────────────────────────────────

/// Per-channel multiplier applied to every pixel a draw call produces.
///
/// Premultiplied like the pixels it scales: fading to half strength is
/// `IDENTITY.scale_alpha(0.5)`, i.e. `[0.5; 4]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorScale(pub [f32; 4]);

impl ColorScale {
    pub const IDENTITY: Self = Self([1.0, 1.0, 1.0, 1.0]);

    pub fn alpha(&self) -> f32 {
        self.0[3]
    }

    /// Multiply all four channels by `a`.
    pub fn scale_alpha(self, a: f32) -> Self {
        Self(self.0.map(|c| c * a))
    }

    pub fn apply(&self, pixel: [u8; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (i, c) in pixel.iter().enumerate() {
            out[i] = (*c as f32 / 255.0) * self.0[i];
        }
        out
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Rgba8> for ColorScale {
    fn from(c: Rgba8) -> Self {
        Self(c.to_f32())
    }
}

// ── FontOptions ───────────────────────────────────────────────────────────────

/// Horizontal placement of each line relative to the draw origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Justify {
    /// Line starts at the origin.
    #[default]
    Left,
    /// Line is centred on the origin.
    Center,
    /// Line ends at the origin.
    Right,
}

/// Style of one text draw call.
///
/// Every field has an explicit default: scale `1.0`, left-justified, no
/// shadow (black when enabled), no outline, identity color scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FontOptions {
    /// Uniform glyph scale, `>= 0`.
    pub scale: f32,
    pub justify: Justify,
    /// Draw each glyph a second time, `0.75 × scale` pixels down and right,
    /// in `shadow_color`, underneath the glyph itself.  Like the outline
    /// color it is premultiplied and faded by `color_scale`'s alpha.
    pub drop_shadow: bool,
    pub shadow_color: Rgba8,
    /// Draw each glyph at its eight one-pixel neighbours in this color first.
    pub outline: Option<Rgba8>,
    pub color_scale: ColorScale,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            justify: Justify::Left,
            drop_shadow: false,
            shadow_color: Rgba8::BLACK,
            outline: None,
            color_scale: ColorScale::IDENTITY,
        }
    }
}

impl FontOptions {
    pub fn scaled(scale: f32) -> Self {
        Self { scale, ..Self::default() }
    }

    pub fn centered(self) -> Self {
        Self { justify: Justify::Center, ..self }
    }

    pub fn right(self) -> Self {
        Self { justify: Justify::Right, ..self }
    }

    pub fn with_drop_shadow(self) -> Self {
        Self { drop_shadow: true, ..self }
    }

    pub fn with_outline(self, color: Rgba8) -> Self {
        Self { outline: Some(color), ..self }
    }

    pub fn with_color_scale(self, color_scale: ColorScale) -> Self {
        Self { color_scale, ..self }
    }
}

// ── BlitTarget ────────────────────────────────────────────────────────────────

/// Destination surface of text drawing.
///
/// `blit` copies `region` of `source`, scaled by `scale` and multiplied by
/// `tint`, with its top-left corner at `position`.  Source pixels and tint
/// are premultiplied.
pub trait BlitTarget {
    fn blit(
        &mut self,
        source: &RgbaImage,
        region: GlyphRect,
        position: Vec2,
        scale: f32,
        tint: ColorScale,
    );
}

/// Software blit: nearest-neighbour scaling and premultiplied source-over
/// blending, `out = src × tint + dst × (1 - a)`.  The image holds
/// premultiplied pixels.
impl BlitTarget for RgbaImage {
    fn blit(
        &mut self,
        source: &RgbaImage,
        region: GlyphRect,
        position: Vec2,
        scale: f32,
        tint: ColorScale,
    ) {
        if scale <= 0.0 || region.width == 0 || region.height == 0 {
            return;
        }

        let dest_w = (region.width as f32 * scale).ceil() as i64;
        let dest_h = (region.height as f32 * scale).ceil() as i64;
        let x0 = position.x.round() as i64;
        let y0 = position.y.round() as i64;

        for dy in 0..dest_h {
            let ty = y0 + dy;
            if ty < 0 || ty >= self.height() as i64 {
                continue;
            }
            let sy = region.y + ((dy as f32 / scale) as u32).min(region.height - 1);

            for dx in 0..dest_w {
                let tx = x0 + dx;
                if tx < 0 || tx >= self.width() as i64 {
                    continue;
                }
                let sx = region.x + ((dx as f32 / scale) as u32).min(region.width - 1);
                let Some(src) = source.get_pixel_checked(sx, sy) else {
                    continue;
                };

                let color = tint.apply(src.0);
                let a = color[3];
                if a <= 0.0 {
                    continue;
                }
                let dst = self.get_pixel_mut(tx as u32, ty as u32);
                let inv = 1.0 - a.min(1.0);
                let mut out = [0u8; 4];
                for (i, c) in out.iter_mut().enumerate() {
                    let blended = color[i] + dst.0[i] as f32 / 255.0 * inv;
                    *c = (blended.clamp(0.0, 1.0) * 255.0).round() as u8;
                }
                dst.0 = out;
            }
        }
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// One glyph placed on screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphQuad {
    pub ch: char,
    /// Top-left corner in destination pixels.
    pub position: Vec2,
    /// Source rectangle in the atlas image.
    pub region: GlyphRect,
    /// Drawn size, `region × scale`.
    pub size: Vec2,
}

/// Position every drawable glyph of `text`.
///
/// - `'\n'` starts a new line `(line_height + vertical_spacing) × scale`
///   further down; each line is justified on its own.
/// - Characters outside 32..=127 are skipped with no advance.
/// - Empty glyphs (space) advance the cursor but produce no quad.
pub fn layout_text(
    atlas: &GlyphAtlas,
    text: &str,
    origin: Vec2,
    options: &FontOptions,
) -> Vec<GlyphQuad> {
    let scale = options.scale;
    let line_step = (atlas.line_height() + atlas.vertical_spacing()) as f32 * scale;
    let mut quads = Vec::new();
    let mut y = origin.y;

    for line in text.split('\n') {
        let mut x = line_start(atlas, line, origin.x, options);
        for ch in line.chars() {
            if let Some(region) = atlas.region(ch) {
                quads.push(GlyphQuad {
                    ch,
                    position: Vec2::new(x, y),
                    region,
                    size: Vec2::new(region.width as f32, region.height as f32) * scale,
                });
            }
            x += advance(atlas, ch) as f32 * scale;
        }
        y += line_step;
    }

    quads
}

fn line_start(atlas: &GlyphAtlas, line: &str, x: f32, options: &FontOptions) -> f32 {
    match options.justify {
        Justify::Left => x,
        Justify::Center => x - measure_width(atlas, line, options.scale) / 2.0,
        Justify::Right => x - measure_width(atlas, line, options.scale),
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

const OUTLINE_OFFSETS: [(f32, f32); 8] = [
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 1.0),
    (0.0, 1.0),
    (1.0, 1.0),
];

fn draw_quads<T: BlitTarget + ?Sized>(
    target: &mut T,
    atlas: &GlyphAtlas,
    quads: &[GlyphQuad],
    options: &FontOptions,
) {
    let scale = options.scale;
    let alpha = options.color_scale.alpha();
    let shadow_offset = Vec2::splat(0.75 * scale);

    for quad in quads {
        if options.drop_shadow {
            let tint = ColorScale::from(options.shadow_color).scale_alpha(alpha);
            target.blit(atlas.image(), quad.region, quad.position + shadow_offset, scale, tint);
        }
        if let Some(color) = options.outline {
            let tint = ColorScale::from(color).scale_alpha(alpha);
            for (dx, dy) in OUTLINE_OFFSETS {
                let offset = Vec2::new(dx, dy) * scale;
                target.blit(atlas.image(), quad.region, quad.position + offset, scale, tint);
            }
        }
        target.blit(atlas.image(), quad.region, quad.position, scale, options.color_scale);
    }
}

/// Draw `text` with its first line's reference point at `origin`.
pub fn render_text<T: BlitTarget + ?Sized>(
    target: &mut T,
    atlas: &GlyphAtlas,
    origin: Vec2,
    options: &FontOptions,
    text: &str,
) {
    let quads = layout_text(atlas, text, origin, options);
    draw_quads(target, atlas, &quads, options);
}

/// Draw pre-wrapped lines, each `line_height × scale + 1` below the last,
/// the same advance [`WrappedText::total_height`] sums.
pub fn render_wrapped<T: BlitTarget + ?Sized>(
    target: &mut T,
    atlas: &GlyphAtlas,
    origin: Vec2,
    options: &FontOptions,
    wrapped: &WrappedText,
) {
    let line_advance = atlas.line_height() as f32 * options.scale + 1.0;
    let mut y = origin.y;
    for line in &wrapped.lines {
        let quads = layout_text(atlas, line, Vec2::new(origin.x, y), options);
        draw_quads(target, atlas, &quads, options);
        y += line_advance;
    }
}

/// Wrap `text` to `max_width` at `options.scale` and draw it.  Returns the
/// layout so callers can reserve `total_height`.
pub fn print_wrap<T: BlitTarget + ?Sized>(
    target: &mut T,
    atlas: &GlyphAtlas,
    origin: Vec2,
    max_width: f32,
    options: &FontOptions,
    text: &str,
) -> WrappedText {
    let wrapped = wrap_text(atlas, text, max_width, options.scale);
    render_wrapped(target, atlas, origin, options, &wrapped);
    wrapped
}
