use thiserror::Error;

use crate::glyph::GlyphBitmap;

// ── DecodeError ───────────────────────────────────────────────────────────────

/// Fatal errors raised while parsing a font container.  Any of these aborts
/// the whole container load.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The stream ends before the header and metadata tables are complete.
    #[error("font container truncated: {len} bytes, need at least {required}")]
    TruncatedHeader { len: usize, required: usize },

    /// A glyph offset points past the end of the stream.
    #[error("font {font} glyph {glyph}: offset 0x{offset:x} lies beyond stream length {len}")]
    InvalidGlyphOffset {
        font: usize,
        glyph: usize,
        offset: usize,
        len: usize,
    },

    /// Glyph data was expected but not a single byte could be read.
    #[error("unable to read glyph {glyph} of font {font} at offset 0x{offset:x}")]
    UnreadableGlyph {
        font: usize,
        glyph: usize,
        offset: usize,
    },

    #[error("invalid font index {0}")]
    InvalidFontIndex(usize),
}

// ── RasterError ───────────────────────────────────────────────────────────────

/// Per-glyph malformed run data.  Recoverable: the glyph is truncated, the
/// rest of the container is unaffected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RasterError {
    #[error("zero-length run at column {column}, row {row}")]
    ZeroLengthRun { column: usize, row: usize },
}

/// A glyph whose run stream stopped early.  `bitmap` holds every pixel
/// decoded before the fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{error}")]
pub struct PartialGlyph {
    pub bitmap: GlyphBitmap,
    pub error: RasterError,
}

// ── PaletteError ──────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette index {index} out of range for palette of {len} colors")]
    PaletteIndexOutOfRange { index: u8, len: usize },
}

// ── RegistryError ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("malformed font registry: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no font named '{0}' in registry")]
    UnknownFont(String),

    #[error("font '{name}' refers to font index {index}, container holds 8")]
    InvalidFontIndex { name: String, index: usize },

    #[error(transparent)]
    Palette(#[from] PaletteError),
}
