//! The `cmap` table maps character codes to glyphs. On the reading side we
//! pick the subtables that can answer lookups for an encoding profile. On the
//! writing side we build a fresh table that only covers the used codes and
//! points at the new glyph IDs.

mod subtable0;
mod subtable12;
mod subtable4;

use crate::cmap::subtable0::ByteSubtable;
use crate::cmap::subtable12::Subtable12;
use crate::cmap::subtable4::Subtable4;
use crate::stream::{read_at, Readable, Reader, Writeable, Writer};
use crate::Error::MalformedFont;
use crate::{Encoding, Result};

#[derive(Debug, Clone, Copy)]
struct EncodingRecord {
    platform_id: u16,
    encoding_id: u16,
    subtable_offset: u32,
}

impl EncodingRecord {
    /// Whether the record maps Unicode code points (or symbol codes in the
    /// private use area).
    fn is_unicode(&self) -> bool {
        self.platform_id == 0
            || (self.platform_id == 3 && [0, 1, 10].contains(&self.encoding_id))
    }

    fn is_mac_roman(&self) -> bool {
        self.platform_id == 1 && self.encoding_id == 0
    }

    fn is_symbol(&self) -> bool {
        self.platform_id == 3 && self.encoding_id == 0
    }
}

impl Readable<'_> for EncodingRecord {
    const SIZE: usize = 8;

    fn read(r: &mut Reader) -> Option<Self> {
        let platform_id = r.read::<u16>()?;
        let encoding_id = r.read::<u16>()?;
        let subtable_offset = r.read::<u32>()?;

        Some(EncodingRecord { platform_id, encoding_id, subtable_offset })
    }
}

impl Writeable for EncodingRecord {
    fn write(&self, w: &mut Writer) {
        w.write::<u16>(self.platform_id);
        w.write::<u16>(self.encoding_id);
        w.write::<u32>(self.subtable_offset);
    }
}

/// A readable subtable of any supported format.
enum Subtable<'a> {
    Byte(ByteSubtable),
    Segmented(Subtable4<'a>),
    Groups(Subtable12),
}

impl<'a> Subtable<'a> {
    fn parse(data: &'a [u8]) -> Option<Self> {
        match read_at::<u16>(data, 0)? {
            0 | 6 => ByteSubtable::parse(data).map(Self::Byte),
            4 => Subtable4::parse(data).map(Self::Segmented),
            12 => Subtable12::parse(data).map(Self::Groups),
            _ => None,
        }
    }

    fn glyph_index(&self, code_point: u32) -> Option<u16> {
        let glyph = match self {
            Self::Byte(table) => table.glyph_index(code_point),
            Self::Segmented(table) => table.glyph_index(code_point),
            Self::Groups(table) => table.glyph_index(code_point),
        }?;

        // 0 is the missing glyph.
        (glyph != 0).then_some(glyph)
    }

    /// Formats that can hold supplementary-plane code points rank higher.
    fn is_full_unicode(&self) -> bool {
        matches!(self, Self::Groups(_))
    }
}

/// The character map of a source font, reduced to the subtables the
/// encoding profiles can use.
pub(crate) struct CharMap<'a> {
    unicode: Option<Subtable<'a>>,
    symbol: Option<Subtable<'a>>,
    mac_roman: Option<Subtable<'a>>,
}

impl<'a> CharMap<'a> {
    pub fn parse(cmap: &'a [u8]) -> Result<Self> {
        let mut r = Reader::new(cmap);
        r.read::<u16>().ok_or(MalformedFont)?; // version
        let num_tables = r.read::<u16>().ok_or(MalformedFont)?;

        let mut map = CharMap { unicode: None, symbol: None, mac_roman: None };

        for _ in 0..num_tables {
            let record = r.read::<EncodingRecord>().ok_or(MalformedFont)?;
            let Some(data) = cmap.get(record.subtable_offset as usize..) else {
                return Err(MalformedFont);
            };

            // Subtables in formats we can't read are simply not used.
            let Some(subtable) = Subtable::parse(data) else {
                log::debug!(
                    "skipping unreadable cmap subtable ({}, {})",
                    record.platform_id,
                    record.encoding_id
                );
                continue;
            };

            if record.is_symbol() {
                map.symbol.get_or_insert(subtable);
            } else if record.is_unicode() {
                let better = match &map.unicode {
                    Some(existing) => {
                        subtable.is_full_unicode() && !existing.is_full_unicode()
                    }
                    None => true,
                };

                if better {
                    map.unicode = Some(subtable);
                }
            } else if record.is_mac_roman() {
                map.mac_roman.get_or_insert(subtable);
            }
        }

        Ok(map)
    }

    /// Whether glyphs can be looked up for the given encoding profile.
    pub fn supports(&self, encoding: Encoding) -> bool {
        let unicode = self.unicode.is_some() || self.symbol.is_some();
        match encoding {
            Encoding::MacRoman => unicode || self.mac_roman.is_some(),
            _ => unicode,
        }
    }

    /// Look up the glyph of a used character.
    ///
    /// `unicode` is the character as passed by the caller. For the code page
    /// profiles, `byte` is its code in the legacy encoding.
    pub fn glyph_index(&self, encoding: Encoding, unicode: u32, byte: Option<u8>) -> Option<u16> {
        if let Some(table) = &self.unicode {
            return table.glyph_index(unicode);
        }

        if let Some(table) = &self.symbol {
            // Symbol fonts put their glyphs into the private use area.
            let code = if unicode < 0x100 { 0xF000 | unicode } else { unicode };
            return table.glyph_index(code).or_else(|| table.glyph_index(unicode));
        }

        match (encoding, &self.mac_roman) {
            (Encoding::MacRoman, Some(table)) => table.glyph_index(u32::from(byte?)),
            _ => None,
        }
    }
}

/// Write the subset `cmap` table from `(code, new glyph)` pairs, sorted by
/// code.
pub(crate) fn subset(encoding: Encoding, mappings: &[(u32, u16)]) -> Vec<u8> {
    let mut subtables: Vec<(EncodingRecord, Vec<u8>)> = vec![];
    let record = |platform_id, encoding_id| EncodingRecord {
        platform_id,
        encoding_id,
        subtable_offset: 0,
    };

    match encoding {
        Encoding::Unicode | Encoding::Unicode8Bit => {
            // 0xFFFF is taken by the terminating segment of format 4.
            let bmp = mappings
                .iter()
                .filter(|&&(c, _)| c < 0xFFFF)
                .map(|&(c, g)| (c as u16, g))
                .collect::<Vec<_>>();

            let table4 = Subtable4::from_mappings(&bmp);
            let fits = table4.size() <= usize::from(u16::MAX);
            if fits {
                let mut w = Writer::new();
                table4.write(&mut w);
                subtables.push((record(3, 1), w.finish()));
            } else {
                log::debug!("cmap: too many segments for format 4, writing format 12 only");
            }

            if !fits || bmp.len() < mappings.len() {
                let mut w = Writer::new();
                Subtable12::from_mappings(mappings).write(&mut w);
                subtables.push((record(3, 10), w.finish()));
            }
        }
        Encoding::MacRoman | Encoding::Windows1252 => {
            let bytes = mappings
                .iter()
                .filter_map(|&(c, g)| Some((u8::try_from(c).ok()?, g)))
                .collect::<Vec<_>>();

            let mut w = Writer::new();
            subtable0::write(&bytes, &mut w);
            subtables.push((record(1, 0), w.finish()));
        }
    }

    let mut sub_cmap = Writer::new();
    let num_tables = subtables.len() as u16;
    let mut subtable_offset = 4 + 8 * u32::from(num_tables);

    sub_cmap.write::<u16>(0); // version
    sub_cmap.write::<u16>(num_tables);

    for (record, data) in &subtables {
        sub_cmap.write(EncodingRecord { subtable_offset, ..*record });
        subtable_offset += data.len() as u32;
    }

    for (_, data) in &subtables {
        sub_cmap.extend(data);
    }

    sub_cmap.finish()
}
