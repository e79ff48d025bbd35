use crate::directory::TableRecord;
use crate::stream::{read_at, Reader};
use crate::Error::{MalformedFont, MissingTable, UnknownKind};
use crate::{Result, Tag};

/// Scaler type of fonts with TrueType outlines.
const SCALER_TRUETYPE: u32 = 0x00010000;
/// Scaler type used by Apple for TrueType fonts.
const SCALER_APPLE_TRUE: u32 = 0x74727565;
/// Scaler type of fonts with CFF outlines.
const SCALER_OPENTYPE: u32 = 0x4F54544F;
/// Tag of a font collection header.
const COLLECTION: u32 = 0x74746366;

/// A parsed font file: the offset subtable, the table directory and random
/// access to the raw table data.
///
/// A `Font` is never mutated after parsing, so it can be shared between any
/// number of [`Subset`](crate::Subset)s, also across threads.
#[derive(Debug, Clone)]
pub struct Font<'a> {
    data: &'a [u8],
    scaler_type: u32,
    records: Vec<TableRecord>,
}

impl<'a> Font<'a> {
    /// Parse a font from sfnt data.
    ///
    /// The `index` is only relevant if the data contains a font collection
    /// (`.ttc` file). Otherwise, it should be 0.
    pub fn parse(data: &'a [u8], index: u32) -> Result<Self> {
        let mut r = Reader::new(data);
        let mut scaler_type = r.read::<u32>().ok_or(MalformedFont)?;

        // Parse font collection header if necessary.
        if scaler_type == COLLECTION {
            let entry = usize::try_from(index).map_err(|_| MalformedFont)?;
            let count = read_at::<u32>(data, 8).ok_or(MalformedFont)?;
            if index >= count {
                return Err(MalformedFont);
            }

            let offset = read_at::<u32>(data, 12 + 4 * entry).ok_or(MalformedFont)?;
            r = Reader::new_at(data, offset as usize);
            scaler_type = r.read::<u32>().ok_or(MalformedFont)?;
        }

        if !matches!(scaler_type, SCALER_TRUETYPE | SCALER_APPLE_TRUE | SCALER_OPENTYPE) {
            return Err(UnknownKind);
        }

        // Read number of table records and skip the search parameters.
        let count = r.read::<u16>().ok_or(MalformedFont)?;
        r.skip_bytes(6).ok_or(MalformedFont)?;

        let mut records = r
            .read_vector::<TableRecord>(usize::from(count))
            .ok_or(MalformedFont)?;

        // Lookups use binary search, but not every font stores the records
        // in order.
        records.sort_by_key(|record| record.tag);

        Ok(Font { data, scaler_type, records })
    }

    /// The scaler type (sfnt version) from the offset subtable.
    pub fn scaler_type(&self) -> u32 {
        self.scaler_type
    }

    /// The tags of all tables, in ascending order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.records.iter().map(|record| record.tag)
    }

    /// The raw data of a table. Returns `None` if the table doesn't exist
    /// or points outside of the font data.
    pub fn table(&self, tag: Tag) -> Option<&'a [u8]> {
        let i = self.records.binary_search_by(|record| record.tag.cmp(&tag)).ok()?;
        let record = self.records.get(i)?;
        let start = record.offset as usize;
        let end = start.checked_add(record.length as usize)?;
        self.data.get(start..end)
    }

    /// The raw data of a table that must exist.
    pub(crate) fn expect_table(&self, tag: Tag) -> Result<&'a [u8]> {
        self.table(tag).ok_or(MissingTable(tag))
    }

    /// The number of glyphs, as declared by the `maxp` table.
    pub fn num_glyphs(&self) -> Result<u16> {
        let maxp = self.expect_table(Tag::MAXP)?;
        read_at::<u16>(maxp, 4).ok_or(MalformedFont)
    }
}
