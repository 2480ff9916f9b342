// Synthetic font containers for the integration tests.

#![allow(dead_code)]

use lbxfont::format::{FONT_COUNT, GLYPH_COUNT, HEADER_SIZE, METADATA_SIZE, glyph_index};
use lbxfont::{FontDef, GlyphDef};

/// One glyph of a test font: character, width and raw run stream.
pub type GlyphSpec<'a> = (char, u32, &'a [u8]);

#[derive(Clone, Default)]
pub struct TestFont {
    pub height: u16,
    pub horizontal_spacing: u16,
    pub vertical_spacing: u16,
    pub widths: Vec<(usize, u8)>,
    pub data: Vec<(usize, Vec<u8>)>,
    pub offset_overrides: Vec<(usize, u16)>,
}

impl TestFont {
    pub fn new(height: u16, horizontal_spacing: u16, vertical_spacing: u16) -> Self {
        Self { height, horizontal_spacing, vertical_spacing, ..Self::default() }
    }

    pub fn glyph(mut self, ch: char, width: u8, data: &[u8]) -> Self {
        let index = glyph_index(ch).expect("printable test glyph");
        self.widths.push((index, width));
        self.data.push((index, data.to_vec()));
        self
    }

    /// Point glyph `ch` at an absolute offset instead of its appended data.
    pub fn offset(mut self, ch: char, offset: u16) -> Self {
        let index = glyph_index(ch).expect("printable test glyph");
        self.offset_overrides.push((index, offset));
        self
    }
}

/// Builds a container byte stream: zeroed header, column-major tables, then
/// each font's glyph data appended in font/glyph order.
#[derive(Clone, Default)]
pub struct ContainerBuilder {
    pub header: Vec<(usize, u8)>,
    pub fonts: Vec<(usize, TestFont)>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, index: usize, font: TestFont) -> Self {
        self.fonts.push((index, font));
        self
    }

    /// Poke a raw header byte.
    pub fn header_byte(mut self, at: usize, value: u8) -> Self {
        self.header.push((at, value));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE + METADATA_SIZE];
        for &(at, value) in &self.header {
            bytes[at] = value;
        }

        let heights = HEADER_SIZE;
        let hspacings = heights + FONT_COUNT * 2;
        let vspacings = hspacings + FONT_COUNT * 2;
        let widths = vspacings + FONT_COUNT * 2;
        let offsets = widths + FONT_COUNT * GLYPH_COUNT;

        let mut glyph_data = Vec::new();
        for (index, font) in &self.fonts {
            put_u16(&mut bytes, heights + index * 2, font.height);
            put_u16(&mut bytes, hspacings + index * 2, font.horizontal_spacing);
            put_u16(&mut bytes, vspacings + index * 2, font.vertical_spacing);
            for &(g, w) in &font.widths {
                bytes[widths + index * GLYPH_COUNT + g] = w;
            }
            for (g, data) in &font.data {
                let at = (HEADER_SIZE + METADATA_SIZE + glyph_data.len()) as u16;
                put_u16(&mut bytes, offsets + (index * GLYPH_COUNT + g) * 2, at);
                glyph_data.extend_from_slice(data);
            }
            for &(g, offset) in &font.offset_overrides {
                put_u16(&mut bytes, offsets + (index * GLYPH_COUNT + g) * 2, offset);
            }
        }

        bytes.extend_from_slice(&glyph_data);
        bytes
    }
}

fn put_u16(bytes: &mut [u8], at: usize, value: u16) {
    bytes[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

/// A font built directly, bypassing the container format.
pub fn font_def(
    height: u32,
    horizontal_spacing: u32,
    vertical_spacing: u32,
    glyphs: &[GlyphSpec],
) -> FontDef {
    let mut table: [GlyphDef; GLYPH_COUNT] = std::array::from_fn(|_| GlyphDef::default());
    for slot in table.iter_mut() {
        slot.height = height;
    }
    for &(ch, width, data) in glyphs {
        let index = glyph_index(ch).expect("printable test glyph");
        table[index] = GlyphDef { width, height, offset: 0, data: data.to_vec() };
    }
    FontDef::new(height, horizontal_spacing, vertical_spacing, table)
}

/// A column stream that fills every column of a `width × height` glyph with
/// color nibble `color`.  `height` must be at most 7.
pub fn solid_columns(width: usize, height: u8, color: u8) -> Vec<u8> {
    let mut data = Vec::new();
    for _ in 0..width {
        data.push((height << 4) | color);
        data.push(0x80);
    }
    data
}

/// Height 10, spacing 1, 'A' and 'B' 6px wide, ' ' 3px wide.
pub fn scenario_font() -> FontDef {
    font_def(10, 1, 0, &[('A', 6, &[]), ('B', 6, &[]), (' ', 3, &[])])
}
