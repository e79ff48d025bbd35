//! Subset the `post` table. The `post` table contains name information for glyphs
//! needed for some PostScript printers. Only version 2 table contains actual custom names,
//! so this is the only version that we need to subset. All we need to do is to extract
//! the strings for all requested glyphs and write them into a new `post` table in the
//! given order.
//!
//! Version 1 tables name the glyphs after the standard Macintosh order, which a subset
//! breaks, so they are converted to version 2. Every other version loses its names and
//! becomes version 3.

use crate::stream::{Reader, Writer};
use crate::util::LazyArray16;
use crate::Error::{MalformedFont, OverflowError};
use crate::{GlyphRemapper, Result};

const VERSION_1: u32 = 0x00010000;
const VERSION_2: u32 = 0x00020000;
const VERSION_3: u32 = 0x00030000;

/// The size of the header shared by all versions.
const HEADER_SIZE: usize = 32;

/// The number of names in the standard Macintosh glyph order.
const NUM_STANDARD_NAMES: u16 = 258;

pub(crate) fn subset(post: &[u8], mapper: &GlyphRemapper) -> Result<Vec<u8>> {
    let mut r = Reader::new(post);
    let version = r.read::<u32>().ok_or(MalformedFont)?;
    let header = post.get(..HEADER_SIZE).ok_or(MalformedFont)?;

    match version {
        VERSION_1 => from_standard_order(header, mapper),
        VERSION_2 => {
            let table = Version2Table::parse(post).ok_or(MalformedFont)?;
            rewrite(&table, mapper)
        }
        _ => {
            log::debug!("post: dropping glyph names of version {version:#010x}");
            let mut sub_post = Writer::with_capacity(HEADER_SIZE);
            sub_post.write::<u32>(VERSION_3);
            sub_post.extend(&header[4..]);
            Ok(sub_post.finish())
        }
    }
}

fn rewrite(table: &Version2Table, mapper: &GlyphRemapper) -> Result<Vec<u8>> {
    let names = table.names().collect::<Vec<_>>();

    let mut sub_post = Writer::new();
    sub_post.extend(table.header);
    sub_post.write(mapper.num_gids());

    let mut string_storage = Writer::new();
    let mut string_index = 0;

    for old_gid in mapper.remapped_gids() {
        let index = table.glyph_indexes.get(old_gid).ok_or(MalformedFont)?;

        // IDs smaller than 258 refer to the names in the Macintosh TrueType file.
        if index < NUM_STANDARD_NAMES {
            sub_post.write(index);
            continue;
        }

        // A custom name that doesn't exist falls back to `.notdef`.
        let Some(name) = names.get(usize::from(index - NUM_STANDARD_NAMES)) else {
            sub_post.write::<u16>(0);
            continue;
        };

        let name_len = u8::try_from(name.len()).map_err(|_| OverflowError)?;
        let index =
            u16::try_from(string_index + usize::from(NUM_STANDARD_NAMES)).map_err(|_| OverflowError)?;
        sub_post.write(index);

        string_storage.write(name_len);
        string_storage.extend(name);
        string_index += 1;
    }

    sub_post.extend(&string_storage.finish());
    Ok(sub_post.finish())
}

fn from_standard_order(header: &[u8], mapper: &GlyphRemapper) -> Result<Vec<u8>> {
    let mut sub_post = Writer::new();
    sub_post.write::<u32>(VERSION_2);
    sub_post.extend(&header[4..]);
    sub_post.write(mapper.num_gids());

    for old_gid in mapper.remapped_gids() {
        let index = if old_gid < NUM_STANDARD_NAMES { old_gid } else { 0 };
        sub_post.write::<u16>(index);
    }

    Ok(sub_post.finish())
}

/// An iterator over glyph names.
///
/// The `post` table doesn't provide the glyph names count,
/// so we have to simply iterate over all of them to find it out.
#[derive(Clone, Copy, Default)]
struct Names<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for Names<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        // Glyph names are stored as Pascal strings: a length byte and the data.
        let len = *self.data.get(self.offset)?;
        self.offset += 1;

        // An empty name is an error.
        if len == 0 {
            return None;
        }

        let name = self.data.get(self.offset..self.offset + usize::from(len))?;
        self.offset += usize::from(len);
        Some(name)
    }
}

/// A version 2 `post` table.
struct Version2Table<'a> {
    header: &'a [u8],
    glyph_indexes: LazyArray16<'a, u16>,
    names_data: &'a [u8],
}

impl<'a> Version2Table<'a> {
    /// Parse a version 2 table.
    fn parse(data: &'a [u8]) -> Option<Self> {
        // Do not check the exact length, because some fonts include
        // padding in table's length in table records, which is incorrect.
        let mut r = Reader::new(data);
        let header = r.read_bytes(HEADER_SIZE)?;

        let indexes_count = r.read::<u16>()?;
        let glyph_indexes = r.read_array16::<u16>(indexes_count)?;
        let names_data = r.tail()?;

        Some(Version2Table { header, glyph_indexes, names_data })
    }

    /// Returns an iterator over glyph names.
    ///
    /// Default/predefined names are not included. Just the one in the font file.
    fn names(&self) -> Names<'a> {
        Names { data: self.names_data, offset: 0 }
    }
}
