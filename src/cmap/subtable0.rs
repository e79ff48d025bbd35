//! The single-byte subtables: format 0 (byte encoding table) and format 6
//! (trimmed table mapping). Both serve the legacy 8-bit code pages.

use crate::stream::{Reader, Writer};

/// A format 0 or format 6 subtable, normalized to a dense array starting at
/// `first_code`.
pub(crate) struct ByteSubtable {
    first_code: u16,
    glyphs: Vec<u16>,
}

impl ByteSubtable {
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut r = Reader::new(data);
        match r.read::<u16>()? {
            0 => {
                r.skip_bytes(4)?; // length + language
                let glyphs = r.read_bytes(256)?.iter().map(|&g| u16::from(g)).collect();
                Some(Self { first_code: 0, glyphs })
            }
            6 => {
                r.skip_bytes(4)?; // length + language
                let first_code = r.read::<u16>()?;
                let count = r.read::<u16>()?;
                let glyphs = r.read_vector::<u16>(usize::from(count))?;
                Some(Self { first_code, glyphs })
            }
            _ => None,
        }
    }

    pub fn glyph_index(&self, code_point: u32) -> Option<u16> {
        let index = code_point.checked_sub(u32::from(self.first_code))?;
        self.glyphs.get(usize::try_from(index).ok()?).copied()
    }
}

/// Write a subtable for single-byte codes, given `(code, glyph)` pairs sorted
/// by code.
///
/// Format 0 can only store glyph IDs up to 255. Larger subsets fall back to
/// format 6, which stores full 16-bit glyph IDs.
pub(crate) fn write(mappings: &[(u8, u16)], w: &mut Writer) {
    if mappings.iter().all(|&(_, g)| g <= 0xFF) {
        let mut glyphs = [0u8; 256];
        for &(c, g) in mappings {
            glyphs[usize::from(c)] = g as u8;
        }

        w.write::<u16>(0); // format
        w.write::<u16>(6 + 256); // length
        w.write::<u16>(0); // language
        w.extend(&glyphs);
        return;
    }

    let first = mappings.first().map(|&(c, _)| c).unwrap_or(0);
    let last = mappings.last().map(|&(c, _)| c).unwrap_or(0);
    let mut glyphs = vec![0u16; usize::from(last - first) + 1];
    for &(c, g) in mappings {
        glyphs[usize::from(c - first)] = g;
    }

    w.write::<u16>(6); // format
    w.write::<u16>(10 + 2 * glyphs.len() as u16); // length
    w.write::<u16>(0); // language
    w.write::<u16>(u16::from(first));
    w.write::<u16>(glyphs.len() as u16);
    w.write_slice(&glyphs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_glyph_ids_use_format_0() {
        let mut w = Writer::new();
        write(&[(0x41, 1), (0xE9, 2)], &mut w);
        let data = w.finish();
        assert_eq!(data.len(), 262);

        let table = ByteSubtable::parse(&data).unwrap();
        assert_eq!(table.glyph_index(0x41), Some(1));
        assert_eq!(table.glyph_index(0xE9), Some(2));
        assert_eq!(table.glyph_index(0x42), Some(0));
    }

    #[test]
    fn large_glyph_ids_use_format_6() {
        let mut w = Writer::new();
        write(&[(0x41, 1), (0x43, 300)], &mut w);
        let data = w.finish();
        assert_eq!(data[..2], [0, 6]);

        let table = ByteSubtable::parse(&data).unwrap();
        assert_eq!(table.glyph_index(0x41), Some(1));
        assert_eq!(table.glyph_index(0x42), Some(0));
        assert_eq!(table.glyph_index(0x43), Some(300));
        assert_eq!(table.glyph_index(0x40), None);
    }
}
