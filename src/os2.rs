//! The `OS/2` table is kept mostly as is. Only the character range and, for
//! newer versions, the average glyph width depend on the subset.

use crate::hmtx::Metric;
use crate::stream::read_at;
use crate::Error::MalformedFont;
use crate::Result;

/// From version 3 on, the average width is taken over all glyphs with a
/// non-zero advance. Older versions weigh the lowercase latin letters, which
/// a subset doesn't necessarily contain, so their value is kept.
const AVERAGE_OVER_ALL_GLYPHS: u16 = 3;

/// Rewrite the table for the character codes in `codes` (sorted) and the
/// metrics of the retained glyphs.
pub(crate) fn subset(os2: &[u8], codes: &[u32], metrics: &[Metric]) -> Result<Vec<u8>> {
    // Version 0 tables from Apple end right after the character range.
    if os2.len() < 68 {
        return Err(MalformedFont);
    }

    let mut sub_os2 = os2.to_vec();
    let version = read_at::<u16>(os2, 0).ok_or(MalformedFont)?;

    if version >= AVERAGE_OVER_ALL_GLYPHS {
        let widths = metrics.iter().map(|m| u32::from(m.advance)).filter(|&a| a > 0);
        let (sum, count) = widths.fold((0u32, 0u32), |(s, c), a| (s + a, c + 1));
        if count > 0 {
            let average = ((sum + count / 2) / count).min(i16::MAX as u32) as i16;
            sub_os2[2..4].copy_from_slice(&average.to_be_bytes());
        }
    }

    if let (Some(&first), Some(&last)) = (codes.first(), codes.last()) {
        let clamp = |code: u32| code.min(0xFFFF) as u16;
        sub_os2[64..66].copy_from_slice(&clamp(first).to_be_bytes());
        sub_os2[66..68].copy_from_slice(&clamp(last).to_be_bytes());
    }

    Ok(sub_os2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(version: u16) -> Vec<u8> {
        let mut data = vec![0; 96];
        data[0..2].copy_from_slice(&version.to_be_bytes());
        data[2..4].copy_from_slice(&500i16.to_be_bytes());
        data
    }

    fn metric(advance: u16) -> Metric {
        Metric { advance, lsb: 0 }
    }

    #[test]
    fn updates_character_range() {
        let data = subset(&table(4), &[0x41, 0x61, 0x1F600], &[]).unwrap();
        assert_eq!(read_at::<u16>(&data, 64), Some(0x41));
        assert_eq!(read_at::<u16>(&data, 66), Some(0xFFFF));
    }

    #[test]
    fn averages_non_zero_widths() {
        let metrics = [metric(0), metric(300), metric(600), metric(601)];
        let data = subset(&table(4), &[], &metrics).unwrap();
        assert_eq!(read_at::<i16>(&data, 2), Some(500));

        let metrics = [metric(100), metric(201)];
        let data = subset(&table(4), &[], &metrics).unwrap();
        assert_eq!(read_at::<i16>(&data, 2), Some(151));
    }

    #[test]
    fn old_versions_keep_average() {
        let data = subset(&table(1), &[], &[metric(100)]).unwrap();
        assert_eq!(read_at::<i16>(&data, 2), Some(500));
    }

    #[test]
    fn short_table_is_malformed() {
        assert!(subset(&[0; 40], &[], &[]).is_err());
    }
}
