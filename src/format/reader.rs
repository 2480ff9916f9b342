// ── ByteReader ────────────────────────────────────────────────────────────────
//
// Little-endian cursor over a borrowed byte slice.  Fixed-width reads return
// `None` when the slice is exhausted; the container decoder turns that into a
// `TruncatedHeader` error.

pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn u8(&mut self) -> Option<u8> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    pub fn u16(&mut self) -> Option<u16> {
        let raw = self.bytes.get(self.pos..self.pos + 2)?;
        self.pos += 2;
        Some(u16::from_le_bytes([raw[0], raw[1]]))
    }

    pub fn array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let raw = self.bytes.get(self.pos..self.pos + N)?;
        self.pos += N;
        let mut out = [0u8; N];
        out.copy_from_slice(raw);
        Some(out)
    }

    pub fn u16_array<const N: usize>(&mut self) -> Option<[u16; N]> {
        let mut out = [0u16; N];
        for slot in out.iter_mut() {
            *slot = self.u16()?;
        }
        Some(out)
    }
}
