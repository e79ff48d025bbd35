//! The OpenType `kern` table. Only the pair lists of format 0 subtables can
//! be mapped onto the new glyph IDs; all other subtables are dropped. Apple's
//! version of the table uses a different header and is dropped entirely.

use crate::stream::{Readable, Reader, Writeable, Writer};
use crate::Error::{MalformedFont, OverflowError};
use crate::{GlyphRemapper, Result};

/// The size of a subtable header: version, length and coverage.
const SUBTABLE_HEADER_SIZE: u16 = 6;

/// The size of a format 0 subtable without its pairs.
const FORMAT0_HEADER_SIZE: usize = 14;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct KerningPair {
    left: u16,
    right: u16,
    value: i16,
}

impl KerningPair {
    /// Pairs are sorted by left and then right glyph.
    fn key(&self) -> u32 {
        (u32::from(self.left) << 16) | u32::from(self.right)
    }
}

impl Readable<'_> for KerningPair {
    const SIZE: usize = 6;

    fn read(r: &mut Reader) -> Option<Self> {
        Some(Self { left: r.read::<u16>()?, right: r.read::<u16>()?, value: r.read::<i16>()? })
    }
}

impl Writeable for KerningPair {
    fn write(&self, w: &mut Writer) {
        w.write::<u16>(self.left);
        w.write::<u16>(self.right);
        w.write::<i16>(self.value);
    }
}

/// Rewrite the table for the retained glyphs. Returns `None` if no kerning
/// information survives.
pub(crate) fn subset(kern: &[u8], mapper: &GlyphRemapper) -> Result<Option<Vec<u8>>> {
    let mut r = Reader::new(kern);
    let version = r.read::<u16>().ok_or(MalformedFont)?;
    if version != 0 {
        log::debug!("kern: dropping table of version {version}");
        return Ok(None);
    }

    let num_tables = r.read::<u16>().ok_or(MalformedFont)?;
    let mut subtables = vec![];

    for _ in 0..num_tables {
        let mut header = r.clone();
        header.read::<u16>().ok_or(MalformedFont)?; // version
        let length = header.read::<u16>().ok_or(MalformedFont)?;
        let coverage = header.read::<u16>().ok_or(MalformedFont)?;

        if coverage >> 8 != 0 {
            if length < SUBTABLE_HEADER_SIZE {
                return Err(MalformedFont);
            }

            log::debug!("kern: dropping subtable of format {}", coverage >> 8);
            r.skip_bytes(usize::from(length)).ok_or(MalformedFont)?;
            continue;
        }

        // The length of big format 0 subtables doesn't fit into 16 bits, so
        // the pair count bounds the size from below.
        let num_pairs = header.read::<u16>().ok_or(MalformedFont)?;
        header.skip_bytes(6).ok_or(MalformedFont)?; // search parameters
        let pairs = header
            .read_array16::<KerningPair>(num_pairs)
            .ok_or(MalformedFont)?;

        let size = usize::from(length).max(FORMAT0_HEADER_SIZE + 6 * usize::from(num_pairs));
        if r.skip_bytes(size).is_none() {
            // A length beyond the table end only matters for the last
            // subtable.
            r = header;
        }

        let mut retained = pairs
            .into_iter()
            .filter_map(|pair| {
                Some(KerningPair {
                    left: mapper.get(pair.left)?,
                    right: mapper.get(pair.right)?,
                    value: pair.value,
                })
            })
            .collect::<Vec<_>>();

        if retained.is_empty() {
            continue;
        }

        retained.sort_by_key(KerningPair::key);
        retained.dedup_by_key(|pair| pair.key());
        subtables.push((coverage, retained));
    }

    if subtables.is_empty() {
        return Ok(None);
    }

    let mut sub_kern = Writer::new();
    sub_kern.write::<u16>(0);
    sub_kern.write::<u16>(subtables.len() as u16);

    for (coverage, pairs) in &subtables {
        let num_pairs = pairs.len() as u16;
        let length = u16::try_from(usize::from(SUBTABLE_HEADER_SIZE) + 8 + 6 * pairs.len())
            .map_err(|_| OverflowError)?;

        let entry_selector = (u16::BITS - num_pairs.leading_zeros() - 1) as u16;
        let search_range = 6 * (1u32 << entry_selector);
        let range_shift = 6 * u32::from(num_pairs) - search_range;

        sub_kern.write::<u16>(0); // version
        sub_kern.write::<u16>(length);
        sub_kern.write::<u16>(*coverage);
        sub_kern.write::<u16>(num_pairs);
        sub_kern.write::<u16>(u16::try_from(search_range).map_err(|_| OverflowError)?);
        sub_kern.write::<u16>(entry_selector);
        sub_kern.write::<u16>(u16::try_from(range_shift).map_err(|_| OverflowError)?);
        sub_kern.write_slice(pairs);
    }

    Ok(Some(sub_kern.finish()))
}
