// ── Column run-length decoding ────────────────────────────────────────────────
//
// The stream is a single byte cursor shared by all columns of the glyph,
// decoded left to right.  Per byte:
//
//   1rrrrrrr   r == 0: end of column
//              r  > 0: skip r rows (left as background)
//   0lllcccc   paint l pixels of index c + 1 downwards (l == 0 is malformed)
//
// A column also ends when the cursor runs out of data, or once its rows are
// all covered.  In the latter case a directly following 0x80 terminator is
// consumed; anything else is left for the next column.

use super::GlyphBitmap;
use crate::error::{PartialGlyph, RasterError};
use crate::format::GlyphDef;

const OPCODE_SKIP: u8 = 0x80;
const END_OF_COLUMN: u8 = 0x80;

/// Decode the run stream of `glyph`.
///
/// Returns `Ok(None)` for empty glyphs (`width == 0`).  A zero-length paint
/// run aborts decoding and yields the pixels decoded so far inside the
/// [`PartialGlyph`] error.
pub fn rasterize(glyph: &GlyphDef) -> Result<Option<GlyphBitmap>, PartialGlyph> {
    if glyph.width == 0 {
        return Ok(None);
    }

    let height = glyph.height as usize;
    let data = glyph.data.as_slice();
    let mut bitmap = GlyphBitmap::new(glyph.width, glyph.height);
    let mut cursor = 0usize;

    for column in 0..glyph.width {
        let mut row = 0usize;

        while cursor < data.len() {
            if row >= height {
                if data[cursor] == END_OF_COLUMN {
                    cursor += 1;
                }
                break;
            }

            let value = data[cursor];
            cursor += 1;

            if value & OPCODE_SKIP != 0 {
                let remaining = (value & 0x7f) as usize;
                if remaining == 0 {
                    break;
                }
                row += remaining;
            } else {
                let length = (value >> 4) as usize;
                let color = value & 0x0f;
                if length == 0 {
                    return Err(PartialGlyph {
                        bitmap,
                        error: RasterError::ZeroLengthRun { column: column as usize, row },
                    });
                }
                for _ in 0..length {
                    bitmap.set(column, row as u32, color + 1);
                    row += 1;
                }
            }
        }
    }

    Ok(Some(bitmap))
}

impl GlyphDef {
    /// Lenient decode: malformed streams are logged and the partial bitmap is
    /// returned.
    pub fn rasterize(&self) -> Option<GlyphBitmap> {
        match rasterize(self) {
            Ok(bitmap) => bitmap,
            Err(partial) => {
                tracing::warn!(
                    "glyph at offset 0x{:x} truncated: {}",
                    self.offset,
                    partial.error
                );
                Some(partial.bitmap)
            }
        }
    }
}
