mod common;

use std::sync::Arc;

use glam::Vec2;
use image::{Rgba, RgbaImage};

use common::{ContainerBuilder, TestFont, font_def, solid_columns};
use lbxfont::{
    AtlasCache, BlitTarget, ColorScale, FontDef, FontOptions, FontRegistry, GlyphAtlas, GlyphRect,
    Palette, RegistryError, Rgba8, build_atlas, decode_container, layout_text, print_wrap,
    render_text,
};

/// Height 4, spacing 1 across and 2 down, 'A' two columns of palette index 2.
/// Every other glyph, space included, is zero-width.
fn block_font() -> FontDef {
    let data = solid_columns(2, 4, 1);
    font_def(4, 1, 2, &[('A', 2, &data)])
}

fn white() -> Palette {
    Palette::solid(Rgba8::WHITE, 2)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Blit {
    region: GlyphRect,
    position: Vec2,
    scale: f32,
    tint: ColorScale,
}

#[derive(Default)]
struct RecordingTarget {
    blits: Vec<Blit>,
}

impl BlitTarget for RecordingTarget {
    fn blit(
        &mut self,
        _source: &RgbaImage,
        region: GlyphRect,
        position: Vec2,
        scale: f32,
        tint: ColorScale,
    ) {
        self.blits.push(Blit { region, position, scale, tint });
    }
}

// ── Effects ───────────────────────────────────────────────────────────────────

#[test]
fn drop_shadow_is_drawn_first_and_offset() {
    let atlas = GlyphAtlas::build(&block_font(), &white()).unwrap();
    let mut target = RecordingTarget::default();
    let options = FontOptions::scaled(2.0).with_drop_shadow();
    render_text(&mut target, &atlas, Vec2::new(10.0, 20.0), &options, "A");

    assert_eq!(target.blits.len(), 2);
    let (shadow, main) = (target.blits[0], target.blits[1]);
    assert_eq!(shadow.position, Vec2::new(11.5, 21.5));
    assert_eq!(shadow.tint, ColorScale([0.0, 0.0, 0.0, 1.0]));
    assert_eq!(main.position, Vec2::new(10.0, 20.0));
    assert_eq!(main.tint, ColorScale::IDENTITY);
    assert_eq!(main.scale, 2.0);
    assert_eq!(shadow.region, main.region);
}

#[test]
fn shadow_fades_with_color_scale_alpha() {
    let atlas = GlyphAtlas::build(&block_font(), &white()).unwrap();
    let mut target = RecordingTarget::default();
    let faded = ColorScale::IDENTITY.scale_alpha(0.5);
    let options = FontOptions::default().with_drop_shadow().with_color_scale(faded);
    render_text(&mut target, &atlas, Vec2::ZERO, &options, "A");

    assert_eq!(target.blits[0].tint, ColorScale([0.0, 0.0, 0.0, 0.5]));
    assert_eq!(target.blits[1].tint, faded);
}

#[test]
fn outline_surrounds_each_glyph() {
    let atlas = GlyphAtlas::build(&block_font(), &white()).unwrap();
    let mut target = RecordingTarget::default();
    let options = FontOptions::scaled(3.0).with_outline(Rgba8::BLACK);
    render_text(&mut target, &atlas, Vec2::new(5.0, 5.0), &options, "A");

    assert_eq!(target.blits.len(), 9);
    for blit in &target.blits[..8] {
        let offset = blit.position - Vec2::new(5.0, 5.0);
        assert!(offset != Vec2::ZERO);
        assert!(offset.x.abs() == 3.0 || offset.x == 0.0);
        assert!(offset.y.abs() == 3.0 || offset.y == 0.0);
    }
    assert_eq!(target.blits[8].position, Vec2::new(5.0, 5.0));
}

// ── Layout ────────────────────────────────────────────────────────────────────

#[test]
fn justification_shifts_line_start() {
    let atlas = GlyphAtlas::build(&block_font(), &white()).unwrap();
    let origin = Vec2::new(20.0, 0.0);

    let left = layout_text(&atlas, "AA", origin, &FontOptions::default());
    let center = layout_text(&atlas, "AA", origin, &FontOptions::default().centered());
    let right = layout_text(&atlas, "AA", origin, &FontOptions::default().right());

    assert_eq!(left[0].position.x, 20.0);
    assert_eq!(center[0].position.x, 17.0);
    assert_eq!(right[0].position.x, 14.0);
    assert_eq!(right[1].position.x, 17.0);
}

#[test]
fn unrepresentable_chars_are_skipped() {
    let atlas = GlyphAtlas::build(&block_font(), &white()).unwrap();
    let quads = layout_text(&atlas, "A\u{263a}\u{7}A", Vec2::ZERO, &FontOptions::default());
    assert_eq!(quads.len(), 2);
    assert_eq!(quads[1].position.x, 3.0);
}

#[test]
fn spaces_advance_without_drawing() {
    let atlas = GlyphAtlas::build(&block_font(), &white()).unwrap();
    let quads = layout_text(&atlas, "A A", Vec2::ZERO, &FontOptions::default());
    assert_eq!(quads.iter().map(|q| q.ch).collect::<String>(), "AA");
    assert_eq!(quads[1].position.x, 4.0);
}

#[test]
fn newline_steps_by_height_plus_vertical_spacing() {
    let atlas = GlyphAtlas::build(&block_font(), &white()).unwrap();
    let quads = layout_text(&atlas, "A\nA", Vec2::new(0.0, 1.0), &FontOptions::scaled(2.0));
    assert_eq!(quads[0].position, Vec2::new(0.0, 1.0));
    assert_eq!(quads[1].position, Vec2::new(0.0, 13.0));
    assert_eq!(quads[1].size, Vec2::new(4.0, 8.0));
}

#[test]
fn print_wrap_advances_by_scaled_height_plus_one() {
    let atlas = GlyphAtlas::build(&block_font(), &white()).unwrap();
    let mut target = RecordingTarget::default();
    let options = FontOptions::scaled(2.0);
    let wrapped = print_wrap(&mut target, &atlas, Vec2::ZERO, 10.0, &options, "A A");

    assert_eq!(wrapped.lines, vec!["A", "A"]);
    assert_eq!(wrapped.total_height, 18.0);
    let ys: Vec<f32> = target.blits.iter().map(|b| b.position.y).collect();
    assert_eq!(ys, vec![0.0, 9.0]);
}

// ── Software blit ─────────────────────────────────────────────────────────────

#[test]
fn rgba_image_receives_glyph_and_shadow() {
    let atlas = GlyphAtlas::build(&block_font(), &white()).unwrap();
    let mut canvas = RgbaImage::new(8, 8);
    let options = FontOptions::default().with_drop_shadow();
    render_text(&mut canvas, &atlas, Vec2::new(1.0, 1.0), &options, "A");

    let white = Rgba([255, 255, 255, 255]);
    let black = Rgba([0, 0, 0, 255]);
    assert_eq!(*canvas.get_pixel(1, 1), white);
    assert_eq!(*canvas.get_pixel(2, 4), white);
    assert_eq!(*canvas.get_pixel(3, 3), black);
    assert_eq!(*canvas.get_pixel(3, 5), black);
    assert_eq!(canvas.get_pixel(0, 0).0[3], 0);
    assert_eq!(canvas.get_pixel(4, 1).0[3], 0);
}

#[test]
fn translucent_shadow_matches_glyph_at_same_alpha() {
    let atlas = GlyphAtlas::build(&block_font(), &white()).unwrap();
    let mut canvas = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
    let options = FontOptions {
        shadow_color: Rgba8::WHITE,
        ..FontOptions::default()
            .with_drop_shadow()
            .with_color_scale(ColorScale::IDENTITY.scale_alpha(0.5))
    };
    render_text(&mut canvas, &atlas, Vec2::new(1.0, 1.0), &options, "A");

    let half = Rgba([128, 128, 128, 255]);
    // (1, 1) is covered by the glyph only, (3, 5) by the shadow only.
    assert_eq!(*canvas.get_pixel(1, 1), half);
    assert_eq!(*canvas.get_pixel(3, 5), half);
}

#[test]
fn blit_keeps_pixels_premultiplied() {
    let faded = ColorScale::IDENTITY.scale_alpha(0.5);
    let atlas = GlyphAtlas::build(&block_font(), &white()).unwrap();
    let mut canvas = RgbaImage::new(4, 4);
    let options = FontOptions::default().with_color_scale(faded);
    render_text(&mut canvas, &atlas, Vec2::ZERO, &options, "A");
    assert_eq!(*canvas.get_pixel(0, 0), Rgba([128, 128, 128, 128]));

    // A translucent palette entry lands the same way as a faded opaque one.
    let translucent = Palette::solid(Rgba8::new(255, 255, 255, 128).premultiplied(), 2);
    let atlas = GlyphAtlas::build(&block_font(), &translucent).unwrap();
    let mut canvas = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
    render_text(&mut canvas, &atlas, Vec2::ZERO, &FontOptions::default(), "A");
    assert_eq!(*canvas.get_pixel(0, 0), Rgba([128, 128, 128, 255]));
}

#[test]
fn rgba_image_blit_scales_nearest_neighbour() {
    let atlas = GlyphAtlas::build(&block_font(), &white()).unwrap();
    let mut canvas = RgbaImage::new(10, 10);
    render_text(&mut canvas, &atlas, Vec2::ZERO, &FontOptions::scaled(2.0), "A");

    let lit = canvas.pixels().filter(|p| p.0[3] == 255).count();
    assert_eq!(lit, 4 * 8);
    assert_eq!(canvas.get_pixel(4, 0).0[3], 0);
}

// ── Caching ───────────────────────────────────────────────────────────────────

#[test]
fn cache_returns_same_atlas_for_same_key() {
    let cache = AtlasCache::new();
    let font = block_font();
    let a = cache.get_or_build(&font, &white()).unwrap();
    let b = cache.get_or_build(&font, &white()).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);

    let tinted = cache.get_or_build(&font, &Palette::solid(Rgba8::BLACK, 2)).unwrap();
    assert!(!Arc::ptr_eq(&a, &tinted));
    assert_eq!(cache.len(), 2);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn distinct_fonts_never_share_an_atlas() {
    let cache = AtlasCache::new();
    let a = cache.get_or_build(&block_font(), &white()).unwrap();
    let b = cache.get_or_build(&block_font(), &white()).unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn edited_copy_of_a_font_gets_its_own_atlas() {
    let cache = AtlasCache::new();
    let font = block_font();
    let original = cache.get_or_build(&font, &white()).unwrap();

    let mut glyphs = font.glyphs().clone();
    glyphs[33].width = 1;
    let edited = FontDef::new(font.height(), 7, font.vertical_spacing(), glyphs);
    let atlas = cache.get_or_build(&edited, &white()).unwrap();

    assert_ne!(edited.key(), font.key());
    assert!(!Arc::ptr_eq(&original, &atlas));
    assert_eq!((atlas.tile_w, atlas.horizontal_spacing), (1, 7));
    assert_eq!((original.tile_w, original.horizontal_spacing), (2, 1));
}

#[test]
fn global_cache_is_shared() {
    let font = block_font();
    let a = build_atlas(&font, &white()).unwrap();
    let b = build_atlas(&font.clone(), &white()).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[test]
fn registry_loads_atlas_from_decoded_container() {
    let bytes = ContainerBuilder::new()
        .font(1, TestFont::new(4, 1, 2).glyph('A', 2, &solid_columns(2, 4, 1)))
        .build();
    let container = decode_container(&bytes).unwrap();
    let registry = FontRegistry::from_json(
        r#"{ "fonts": {
            "Normal": { "font": 1, "palette": [[0,0,0,0],[0,0,0,0],[10,20,30,255]] },
            "Missing": { "font": 8, "palette": [] }
        } }"#,
    )
    .unwrap();

    let cache = AtlasCache::new();
    let atlas = registry.load_in(&cache, &container, "Normal").unwrap();
    assert_eq!(atlas.font_key(), container.fonts[1].key());
    let region = atlas.region('A').unwrap();
    assert_eq!(*atlas.image().get_pixel(region.x, region.y), Rgba([10, 20, 30, 255]));

    assert!(matches!(
        registry.load_in(&cache, &container, "Nope"),
        Err(RegistryError::UnknownFont(_))
    ));
    assert!(matches!(
        registry.load_in(&cache, &container, "Missing"),
        Err(RegistryError::InvalidFontIndex { index: 8, .. })
    ));
}
