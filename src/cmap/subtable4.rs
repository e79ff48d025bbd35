use crate::stream::{read_at, Reader, Writer};
use std::borrow::Cow;

/// A Format 4 subtable.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Subtable4<'a> {
    language: u16,
    seg_count: u16,
    end_codes: Vec<u16>,
    start_codes: Vec<u16>,
    id_deltas: Vec<i16>,
    id_range_offsets: Vec<u16>,
    glyph_id_array: Cow<'a, [u8]>,
}

impl<'a> Subtable4<'a> {
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut r = Reader::new(data);
        r.skip_bytes(4)?; // format + length
        let language = r.read::<u16>()?;
        let seg_count_x2 = r.read::<u16>()?;

        if seg_count_x2 < 2 {
            return None;
        }

        let seg_count = seg_count_x2 / 2;
        r.skip_bytes(6)?; // search range + entry selector + range shift
        let end_codes = r.read_vector::<u16>(seg_count as usize)?;
        r.skip_bytes(2)?; // reserved pad
        let start_codes = r.read_vector::<u16>(seg_count as usize)?;
        let id_deltas = r.read_vector::<i16>(seg_count as usize)?;

        // Range offsets are relative to their own position, so the glyph id
        // array is addressed from the start of the offsets.
        let glyph_id_array = Cow::Borrowed(r.tail()?);
        let id_range_offsets = r.read_vector::<u16>(seg_count as usize)?;

        Some(Subtable4 {
            language,
            seg_count,
            end_codes,
            start_codes,
            id_deltas,
            id_range_offsets,
            glyph_id_array,
        })
    }

    /// Build a subtable from `(code, glyph)` pairs sorted by code.
    ///
    /// Runs of consecutive codes with a constant code-to-glyph delta are
    /// merged into one segment, so no glyph id array is needed.
    pub fn from_mappings(mappings: &[(u16, u16)]) -> Subtable4<'static> {
        let delta = |pair: (u16, u16)| pair.1.wrapping_sub(pair.0) as i16;

        let mut segments = vec![];
        let mut map_iter = mappings.iter().copied().filter(|&(c, _)| c != 0xFFFF);

        if let Some(first) = map_iter.next() {
            let mut cur_start = first.0;
            let mut cur_delta = delta(first);
            let mut cur_range = 0;

            for next in map_iter {
                if next.0 == cur_start + cur_range + 1 && delta(next) == cur_delta {
                    cur_range += 1;
                    continue;
                }

                segments.push((cur_start, cur_start + cur_range, cur_delta));
                cur_start = next.0;
                cur_delta = delta(next);
                cur_range = 0;
            }

            // Don't forget the last range!
            segments.push((cur_start, cur_start + cur_range, cur_delta));
        }

        // "For the search to terminate, the final start code and endCode values must
        // be 0xFFFF. This segment need not contain any valid mappings. (It can just map the
        // single character code 0xFFFF to missingGlyph). However, the segment must be present."
        segments.push((0xFFFF, 0xFFFF, 1));

        let seg_count = segments.len() as u16;
        Subtable4 {
            language: 0,
            seg_count,
            end_codes: segments.iter().map(|e| e.1).collect(),
            start_codes: segments.iter().map(|e| e.0).collect(),
            id_deltas: segments.iter().map(|e| e.2).collect(),
            id_range_offsets: vec![0; seg_count as usize],
            glyph_id_array: Cow::Owned(vec![]),
        }
    }

    /// Returns a glyph index for a code point.
    pub fn glyph_index(&self, code_point: u32) -> Option<u16> {
        // This subtable supports code points only in a u16 range.
        let code_point = u16::try_from(code_point).ok()?;

        // A custom binary search.
        let mut start = 0;
        let mut end = self.start_codes.len();
        while end > start {
            let index = (start + end) / 2;
            let end_value = *self.end_codes.get(index)?;
            if end_value >= code_point {
                let start_value = *self.start_codes.get(index)?;
                if start_value > code_point {
                    end = index;
                } else {
                    let id_range_offset = *self.id_range_offsets.get(index)?;
                    let id_delta = *self.id_deltas.get(index)?;
                    if id_range_offset == 0 {
                        return Some(code_point.wrapping_add(id_delta as u16));
                    } else if id_range_offset == 0xFFFF {
                        // Some malformed fonts have 0xFFFF as the last offset,
                        // which is invalid and should be ignored.
                        return None;
                    }

                    let delta = (u32::from(code_point) - u32::from(start_value)) * 2;
                    let delta = u16::try_from(delta).ok()?;

                    let id_range_offset_pos = (index * 2) as u16;
                    let pos = id_range_offset_pos.wrapping_add(delta);
                    let pos = pos.wrapping_add(id_range_offset);

                    let glyph_array_value: u16 =
                        read_at(self.glyph_id_array.as_ref(), usize::from(pos))?;

                    // 0 indicates missing glyph.
                    if glyph_array_value == 0 {
                        return None;
                    }

                    return Some(glyph_array_value.wrapping_add(id_delta as u16));
                }
            } else {
                start = index + 1;
            }
        }

        None
    }

    /// The size of the written subtable in bytes. It must not exceed
    /// `u16::MAX` for the subtable to be writable.
    pub fn size(&self) -> usize {
        // (format + length + language + seg_count_x2 + search_range +
        // entry_selector + range_shift + reserved_pad) + seg_count *
        // (end_code + start_code + id_delta + id_range_offsets)
        2 * 8 + 2 * self.end_codes.len() * 4 + self.glyph_id_array.len()
    }

    pub fn write(&self, w: &mut Writer) {
        debug_assert!(self.size() <= usize::from(u16::MAX));

        w.write::<u16>(4); // format
        w.write::<u16>(self.size() as u16);
        w.write::<u16>(self.language);

        let seg_count_x2 = (2 * u32::from(self.seg_count)) as u16;
        let floor_log_2 = (u16::BITS - self.seg_count.leading_zeros()) - 1;
        let search_range = 2 * 2u16.pow(floor_log_2);
        let entry_selector = floor_log_2 as u16;
        let range_shift = seg_count_x2 - search_range;

        w.write::<u16>(seg_count_x2);
        w.write::<u16>(search_range);
        w.write::<u16>(entry_selector);
        w.write::<u16>(range_shift);

        w.write_slice(&self.end_codes);
        w.write::<u16>(0); // reserved pad
        w.write_slice(&self.start_codes);
        w.write_slice(&self.id_deltas);
        w.write_slice(&self.id_range_offsets);
    }
}
