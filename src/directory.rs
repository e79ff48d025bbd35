//! The table directory: records, checksums and the layout of a new font file.

use crate::stream::{Readable, Reader, Writeable, Writer};
use crate::Tag;
use std::borrow::Cow;

/// The magic number the whole-font checksum must add up to.
const CHECKSUM_MAGIC: u32 = 0xB1B0AFBA;

/// Byte offset of `checksumAdjustment` inside the `head` table.
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

/// Locates a table in the font file.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TableRecord {
    /// The table's tag.
    pub tag: Tag,
    /// The checksum over the zero-padded table data.
    pub checksum: u32,
    /// The offset from the start of the file.
    pub offset: u32,
    /// The unpadded length of the table.
    pub length: u32,
}

impl Readable<'_> for TableRecord {
    const SIZE: usize = 16;

    fn read(r: &mut Reader) -> Option<Self> {
        Some(TableRecord {
            tag: r.read::<Tag>()?,
            checksum: r.read::<u32>()?,
            offset: r.read::<u32>()?,
            length: r.read::<u32>()?,
        })
    }
}

impl Writeable for TableRecord {
    fn write(&self, w: &mut Writer) {
        w.write::<Tag>(self.tag);
        w.write::<u32>(self.checksum);
        w.write::<u32>(self.offset);
        w.write::<u32>(self.length);
    }
}

/// The binary search parameters of a table directory, derived from the
/// number of tables.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SearchParams {
    /// `16 * 2^entry_selector`.
    pub search_range: u16,
    /// `floor(log2(count))`.
    pub entry_selector: u16,
    /// `16 * count - search_range`.
    pub range_shift: u16,
}

impl SearchParams {
    /// Compute the parameters for `count` table records.
    pub fn new(count: u16) -> Self {
        if count == 0 {
            return Self { search_range: 0, entry_selector: 0, range_shift: 0 };
        }

        let entry_selector = (u16::BITS - count.leading_zeros() - 1) as u16;
        let search_range = (1u16 << entry_selector) * 16;
        let range_shift = count * 16 - search_range;
        Self { search_range, entry_selector, range_shift }
    }
}

/// Calculate a checksum over the sliced data as a sum of u32s. If the data
/// length is not a multiple of four, it is treated as if padded with zero to a
/// length that is a multiple of four.
pub fn checksum(data: &[u8]) -> u32 {
    let mut sum = 0u32;
    for chunk in data.chunks(4) {
        let mut bytes = [0; 4];
        bytes[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(bytes));
    }
    sum
}

/// Construct a brand new font from a scaler type and finished tables.
pub(crate) fn construct(scaler_type: u32, mut tables: Vec<(Tag, Cow<'_, [u8]>)>) -> Vec<u8> {
    // Tables shall be sorted by tag.
    tables.sort_by_key(|&(tag, _)| tag);

    let count = tables.len() as u16;
    let params = SearchParams::new(count);
    let total = 12
        + 16 * tables.len()
        + tables.iter().map(|(_, data)| data.len().next_multiple_of(4)).sum::<usize>();

    let mut w = Writer::with_capacity(total);
    w.write::<u32>(scaler_type);
    w.write::<u16>(count);
    w.write::<u16>(params.search_range);
    w.write::<u16>(params.entry_selector);
    w.write::<u16>(params.range_shift);

    // This variable will hold the offset to the checksum adjustment field
    // in the head table, which we'll have to write in the end (after
    // checksumming the whole font).
    let mut checksum_adjustment_offset = None;

    // Write table records.
    let mut offset = 12 + tables.len() * 16;
    for (tag, data) in &mut tables {
        if *tag == Tag::HEAD {
            if let Some(field) = data.to_mut().get_mut(
                CHECKSUM_ADJUSTMENT_OFFSET..CHECKSUM_ADJUSTMENT_OFFSET + 4,
            ) {
                field.fill(0);
                checksum_adjustment_offset = Some(offset + CHECKSUM_ADJUSTMENT_OFFSET);
            }
        }

        let len = data.len();
        w.write(TableRecord {
            tag: *tag,
            checksum: checksum(data),
            offset: offset as u32,
            length: len as u32,
        });

        log::trace!("{tag}: {len} bytes at {offset}");

        // Increase offset, plus padding zeros to align to 4 bytes.
        offset += len.next_multiple_of(4);
    }

    // Write tables.
    for (_, data) in &tables {
        // Write data plus padding zeros to align to 4 bytes.
        w.extend(data);
        w.align(4);
    }

    // Write checksum adjustment field in head table.
    let mut data = w.finish();
    if let Some(i) = checksum_adjustment_offset {
        let sum = checksum(&data);
        let val = CHECKSUM_MAGIC.wrapping_sub(sum);
        data[i..i + 4].copy_from_slice(&val.to_be_bytes());
    }

    data
}
