//! Binary font container decoding.
//!
//! A container is one little-endian blob holding a fixed header, metadata
//! tables for exactly [`FONT_COUNT`] fonts stored column-major (all heights,
//! then all horizontal spacings, then all vertical spacings, then the width
//! tables, then the offset tables), followed by glyph run data addressed by
//! absolute offsets.
//!
//! ```text
//! 0x000  header              362 bytes
//! 0x16A  heights             8 × u16
//! 0x17A  horizontal spacing  8 × u16
//! 0x18A  vertical spacing    8 × u16
//! 0x19A  glyph widths        8 × 96 × u8
//! 0x49A  glyph offsets       8 × 96 × u16
//! 0xA9A  glyph data          (addressed by offset)
//! ```

mod reader;

use std::sync::atomic::{AtomicU64, Ordering};

use reader::ByteReader;

use crate::error::DecodeError;

// ── Layout constants ──────────────────────────────────────────────────────────

/// Number of fonts in every container.
pub const FONT_COUNT: usize = 8;
/// Number of glyphs per font, covering codepoints 32..=127.
pub const GLYPH_COUNT: usize = 96;
/// Codepoint of glyph index 0.
pub const FIRST_CODEPOINT: u32 = 32;

/// Size of the leading header record.
pub const HEADER_SIZE: usize =
    16 + 2 + 1 + 1 + 16 + 16 + 16 + 2 + 2 + 2 + GLYPH_COUNT + GLYPH_COUNT * 2;

/// Size of the metadata tables that follow the header.
pub const METADATA_SIZE: usize =
    FONT_COUNT * 2 * 3 + FONT_COUNT * GLYPH_COUNT + FONT_COUNT * GLYPH_COUNT * 2;

// ── FontKey ───────────────────────────────────────────────────────────────────

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one font: the decode it came from plus its slot index.
///
/// Every call to [`decode_container`] / [`decode_font`] mints a fresh
/// container id, so two decodes of the same bytes produce distinct keys.
/// Clones of a [`FontDef`] share its key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontKey {
    pub container: u64,
    pub index: usize,
}

// ── ContainerHeader ───────────────────────────────────────────────────────────

/// The leading header record.  These fields hold the game engine's runtime
/// state and are usually all zero on disk; they are kept for inspection only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerHeader {
    pub current_colors: [u8; 16],
    pub font_height: u16,
    pub outline_style: u8,
    pub color_index: u8,
    pub colors: [[u8; 16]; 3],
    pub line_height: u16,
    pub vertical_spacing: u16,
    pub horizontal_spacing: u16,
    pub glyph_widths: [u8; GLYPH_COUNT],
    pub glyph_offsets: [u16; GLYPH_COUNT],
}

// ── GlyphDef ──────────────────────────────────────────────────────────────────

/// Raw, still run-length-encoded glyph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphDef {
    /// Pixel width; `0` marks an empty glyph with no data (e.g. space).
    pub width: u32,
    /// Pixel height, always the owning font's height.
    pub height: u32,
    /// Absolute offset of the run data in the container stream.
    pub offset: usize,
    /// Column run stream.  At most `width × height` bytes; shorter when the
    /// container ends early.
    pub data: Vec<u8>,
}

impl GlyphDef {
    pub fn is_empty(&self) -> bool {
        self.width == 0
    }
}

// ── FontDef ───────────────────────────────────────────────────────────────────

/// One decoded font.  Read-only once built: the metrics and glyphs are only
/// reachable through accessors, so everything sharing a [`FontKey`] (clones
/// included) describes the same font.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontDef {
    key: FontKey,
    height: u32,
    horizontal_spacing: u32,
    vertical_spacing: u32,
    glyphs: [GlyphDef; GLYPH_COUNT],
}

impl FontDef {
    fn empty(key: FontKey) -> Self {
        Self {
            key,
            height: 0,
            horizontal_spacing: 0,
            vertical_spacing: 0,
            glyphs: std::array::from_fn(|_| GlyphDef::default()),
        }
    }

    /// Build a font directly from metrics and glyphs, with a fresh identity.
    pub fn new(
        height: u32,
        horizontal_spacing: u32,
        vertical_spacing: u32,
        glyphs: [GlyphDef; GLYPH_COUNT],
    ) -> Self {
        Self {
            key: FontKey { container: next_container_id(), index: 0 },
            height,
            horizontal_spacing,
            vertical_spacing,
            glyphs,
        }
    }

    pub fn key(&self) -> FontKey {
        self.key
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn horizontal_spacing(&self) -> u32 {
        self.horizontal_spacing
    }

    pub fn vertical_spacing(&self) -> u32 {
        self.vertical_spacing
    }

    pub fn glyphs(&self) -> &[GlyphDef; GLYPH_COUNT] {
        &self.glyphs
    }

    /// Glyph for `ch`, or `None` outside the printable range 32..=127.
    pub fn glyph_for_char(&self, ch: char) -> Option<&GlyphDef> {
        glyph_index(ch).map(|i| &self.glyphs[i])
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn max_glyph_width(&self) -> u32 {
        self.glyphs.iter().map(|g| g.width).max().unwrap_or(0)
    }
}

/// Index into a font's glyph table for `ch`, if it is representable.
pub fn glyph_index(ch: char) -> Option<usize> {
    let code = ch as u32;
    if (FIRST_CODEPOINT..FIRST_CODEPOINT + GLYPH_COUNT as u32).contains(&code) {
        Some((code - FIRST_CODEPOINT) as usize)
    } else {
        None
    }
}

// ── FontContainer ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontContainer {
    pub header: ContainerHeader,
    pub fonts: [FontDef; FONT_COUNT],
}

impl FontContainer {
    pub fn font(&self, index: usize) -> Option<&FontDef> {
        self.fonts.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FontDef> {
        self.fonts.iter()
    }
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Column-major metadata tables for all fonts.
struct FontTables {
    heights: [u16; FONT_COUNT],
    horizontal_spacings: [u16; FONT_COUNT],
    vertical_spacings: [u16; FONT_COUNT],
    widths: [[u8; GLYPH_COUNT]; FONT_COUNT],
    offsets: [[u16; GLYPH_COUNT]; FONT_COUNT],
}

/// Parse a complete container: header, metadata and all 8 × 96 glyph streams.
pub fn decode_container(bytes: &[u8]) -> Result<FontContainer, DecodeError> {
    let header = read_header(bytes)?;
    let tables = read_tables(bytes)?;
    let container = next_container_id();

    let mut fonts: [FontDef; FONT_COUNT] =
        std::array::from_fn(|index| FontDef::empty(FontKey { container, index }));
    for (index, font) in fonts.iter_mut().enumerate() {
        read_glyphs(bytes, &tables, font, index)?;
    }

    tracing::info!(
        "decoded font container: {} bytes, heights {:?}",
        bytes.len(),
        tables.heights
    );
    Ok(FontContainer { header, fonts })
}

/// Parse the shared metadata but only the glyph streams of font `index`.
pub fn decode_font(bytes: &[u8], index: usize) -> Result<FontDef, DecodeError> {
    let tables = read_tables(bytes)?;
    if index >= FONT_COUNT {
        return Err(DecodeError::InvalidFontIndex(index));
    }

    let mut font = FontDef::empty(FontKey { container: next_container_id(), index });
    read_glyphs(bytes, &tables, &mut font, index)?;
    Ok(font)
}

fn next_container_id() -> u64 {
    NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed)
}

fn truncated(bytes: &[u8]) -> DecodeError {
    DecodeError::TruncatedHeader {
        len: bytes.len(),
        required: HEADER_SIZE + METADATA_SIZE,
    }
}

fn read_header(bytes: &[u8]) -> Result<ContainerHeader, DecodeError> {
    let mut r = ByteReader::new(bytes);
    let header = (|| {
        Some(ContainerHeader {
            current_colors: r.array()?,
            font_height: r.u16()?,
            outline_style: r.u8()?,
            color_index: r.u8()?,
            colors: [r.array()?, r.array()?, r.array()?],
            line_height: r.u16()?,
            vertical_spacing: r.u16()?,
            horizontal_spacing: r.u16()?,
            glyph_widths: r.array()?,
            glyph_offsets: r.u16_array()?,
        })
    })();
    header.ok_or_else(|| truncated(bytes))
}

fn read_tables(bytes: &[u8]) -> Result<FontTables, DecodeError> {
    if bytes.len() < HEADER_SIZE + METADATA_SIZE {
        return Err(truncated(bytes));
    }

    let mut r = ByteReader::new(&bytes[HEADER_SIZE..]);
    let tables = (|| {
        let heights: [u16; FONT_COUNT] = r.u16_array()?;
        let horizontal_spacings: [u16; FONT_COUNT] = r.u16_array()?;
        let vertical_spacings: [u16; FONT_COUNT] = r.u16_array()?;
        let mut widths = [[0u8; GLYPH_COUNT]; FONT_COUNT];
        for row in widths.iter_mut() {
            *row = r.array()?;
        }
        let mut offsets = [[0u16; GLYPH_COUNT]; FONT_COUNT];
        for row in offsets.iter_mut() {
            *row = r.u16_array()?;
        }
        Some(FontTables { heights, horizontal_spacings, vertical_spacings, widths, offsets })
    })();
    tables.ok_or_else(|| truncated(bytes))
}

fn read_glyphs(
    bytes: &[u8],
    tables: &FontTables,
    font: &mut FontDef,
    index: usize,
) -> Result<(), DecodeError> {
    let height = tables.heights[index] as u32;
    font.height = height;
    font.horizontal_spacing = tables.horizontal_spacings[index] as u32;
    font.vertical_spacing = tables.vertical_spacings[index] as u32;

    for (g, glyph) in font.glyphs.iter_mut().enumerate() {
        let width = tables.widths[index][g] as u32;
        let offset = tables.offsets[index][g] as usize;
        *glyph = GlyphDef { width, height, offset, data: Vec::new() };

        if width == 0 {
            continue;
        }
        if offset > bytes.len() {
            return Err(DecodeError::InvalidGlyphOffset {
                font: index,
                glyph: g,
                offset,
                len: bytes.len(),
            });
        }

        let expected = (width * height) as usize;
        // Short reads at the end of the stream are kept as-is.
        let end = (offset + expected).min(bytes.len());
        if expected > 0 && end == offset {
            return Err(DecodeError::UnreadableGlyph { font: index, glyph: g, offset });
        }
        glyph.data = bytes[offset..end].to_vec();
    }
    Ok(())
}
