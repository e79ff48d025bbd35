//! The `name` table is reduced to the records that identify the font. The
//! family, unique, full and PostScript names get the subset tag as a prefix,
//! so that the subset can't be mistaken for the complete font.

use crate::stream::{Readable, Reader, Writeable, Writer};
use crate::util::{decode_utf16, encode_ascii};
use crate::Error::{MalformedFont, OverflowError};
use crate::{Result, SubsetTag};
use rustc_hash::FxHashMap;

/// Name IDs the subset keeps: copyright, family, subfamily, unique
/// identifier, full name, version and PostScript name.
const KEPT_NAME_IDS: [u16; 7] = [0, 1, 2, 3, 4, 5, 6];

/// Name IDs that receive the subset tag prefix.
const TAGGED_NAME_IDS: [u16; 4] = [1, 3, 4, 6];

const FAMILY: u16 = 1;
const POSTSCRIPT_NAME: u16 = 6;

#[derive(Debug, Copy, Clone)]
struct NameRecord {
    platform_id: u16,
    encoding_id: u16,
    language_id: u16,
    name_id: u16,
    length: u16,
    string_offset: u16,
}

impl NameRecord {
    fn is_unicode(&self) -> bool {
        self.platform_id == 0
            || (self.platform_id == 3 && [0, 1, 10].contains(&self.encoding_id))
    }

    fn is_mac_roman(&self) -> bool {
        self.platform_id == 1 && self.encoding_id == 0
    }

    fn sort_key(&self) -> (u16, u16, u16, u16) {
        (self.platform_id, self.encoding_id, self.language_id, self.name_id)
    }
}

impl Readable<'_> for NameRecord {
    const SIZE: usize = u16::SIZE * 6;

    fn read(r: &mut Reader<'_>) -> Option<Self> {
        let platform_id = r.read::<u16>()?;
        let encoding_id = r.read::<u16>()?;
        let language_id = r.read::<u16>()?;
        let name_id = r.read::<u16>()?;
        let length = r.read::<u16>()?;
        let string_offset = r.read::<u16>()?;

        Some(Self {
            platform_id,
            encoding_id,
            language_id,
            name_id,
            length,
            string_offset,
        })
    }
}

impl Writeable for NameRecord {
    fn write(&self, w: &mut Writer) {
        w.write::<u16>(self.platform_id);
        w.write::<u16>(self.encoding_id);
        w.write::<u16>(self.language_id);
        w.write::<u16>(self.name_id);
        w.write::<u16>(self.length);
        w.write::<u16>(self.string_offset);
    }
}

/// A PostScript name may only contain printable ASCII without the delimiter
/// characters.
fn postscript_name(family: &str) -> String {
    family
        .chars()
        .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%".contains(*c))
        .collect()
}

pub(crate) fn subset(name: &[u8], tag: &SubsetTag) -> Result<Vec<u8>> {
    let mut r = Reader::new(name);

    // Version 1 adds language tags after the records. They are only
    // referenced by language IDs from 0x8000 on, which we drop, so the
    // result is always version 0.
    let version = r.read::<u16>().ok_or(MalformedFont)?;
    if version > 1 {
        return Err(MalformedFont);
    }

    let count = r.read::<u16>().ok_or(MalformedFont)?;
    let storage_offset = r.read::<u16>().ok_or(MalformedFont)?;
    let records = r.read_vector::<NameRecord>(usize::from(count)).ok_or(MalformedFont)?;
    let storage = name.get(usize::from(storage_offset)..).ok_or(MalformedFont)?;

    let prefix = tag.prefix();
    let mut entries: Vec<(NameRecord, Vec<u8>)> = vec![];

    for record in records {
        if !(record.is_unicode() || record.is_mac_roman())
            || !KEPT_NAME_IDS.contains(&record.name_id)
            || record.language_id >= 0x8000
        {
            continue;
        }

        let start = usize::from(record.string_offset);
        let end = start + usize::from(record.length);
        let string = storage.get(start..end).ok_or(MalformedFont)?;

        let mut data = vec![];
        if TAGGED_NAME_IDS.contains(&record.name_id) {
            data.extend(encode_ascii(&prefix, record.is_unicode()));
        }
        data.extend(string);
        entries.push((record, data));
    }

    // Make sure there is a PostScript name that carries the tag.
    if !entries.iter().any(|(record, _)| record.name_id == POSTSCRIPT_NAME) {
        let families = entries
            .iter()
            .filter(|(record, _)| record.name_id == FAMILY)
            .map(|(record, data)| {
                let unicode = record.is_unicode();
                let family = if unicode {
                    decode_utf16(data)
                } else {
                    data.iter().map(|&b| char::from(b)).collect()
                };
                let synthesized = NameRecord { name_id: POSTSCRIPT_NAME, ..*record };
                (synthesized, encode_ascii(&postscript_name(&family), unicode))
            })
            .collect::<Vec<_>>();

        if !families.is_empty() {
            log::debug!("name: synthesizing {} PostScript name records", families.len());
        }

        entries.extend(families);
    }

    entries.sort_by_key(|(record, _)| record.sort_key());
    write(entries)
}

fn write(mut entries: Vec<(NameRecord, Vec<u8>)>) -> Result<Vec<u8>> {
    let count = u16::try_from(entries.len()).map_err(|_| OverflowError)?;

    let mut storage = Writer::new();
    let mut deduplicator: FxHashMap<Vec<u8>, u16> = FxHashMap::default();

    for (record, data) in &mut entries {
        record.length = u16::try_from(data.len()).map_err(|_| OverflowError)?;
        record.string_offset = match deduplicator.get(data.as_slice()) {
            Some(&offset) => offset,
            None => {
                let offset = u16::try_from(storage.len()).map_err(|_| OverflowError)?;
                storage.extend(data);
                deduplicator.insert(data.clone(), offset);
                offset
            }
        };
    }

    let mut sub_name = Writer::new();
    sub_name.write::<u16>(0); // version
    sub_name.write::<u16>(count);
    sub_name.write::<u16>(6 + 12 * count); // storage offset

    for (record, _) in &entries {
        sub_name.write(record);
    }

    sub_name.extend(&storage.finish());
    Ok(sub_name.finish())
}
