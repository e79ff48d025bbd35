//! The `hmtx` table stores an advance width and a left side bearing per glyph.
//! Glyphs past `numberOfHMetrics` share the last advance width and only store
//! their bearing. The subset always writes one full metric per glyph, which is
//! why `hhea` gets the glyph count as its new `numberOfHMetrics`.

use crate::stream::{read_at, Writer};
use crate::Error::MalformedFont;
use crate::{Font, GlyphRemapper, Result, Tag};

/// The horizontal metric of a single glyph.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Metric {
    pub advance: u16,
    pub lsb: i16,
}

/// The number of long metrics, stored in the `hhea` table.
pub(crate) fn num_h_metrics(font: &Font) -> Result<u16> {
    let hhea = font.expect_table(Tag::HHEA)?;
    read_at::<u16>(hhea, 34).ok_or(MalformedFont)
}

fn metric(hmtx: &[u8], num_h_metrics: u16, gid: u16) -> Result<Metric> {
    if num_h_metrics == 0 {
        return Err(MalformedFont);
    }

    let metric = if gid < num_h_metrics {
        let offset = 4 * usize::from(gid);
        Metric {
            advance: read_at::<u16>(hmtx, offset).ok_or(MalformedFont)?,
            lsb: read_at::<i16>(hmtx, offset + 2).ok_or(MalformedFont)?,
        }
    } else {
        let last = 4 * usize::from(num_h_metrics - 1);
        let offset = 4 * usize::from(num_h_metrics) + 2 * usize::from(gid - num_h_metrics);
        Metric {
            advance: read_at::<u16>(hmtx, last).ok_or(MalformedFont)?,
            lsb: read_at::<i16>(hmtx, offset).ok_or(MalformedFont)?,
        }
    };

    Ok(metric)
}

pub(crate) struct HmtxOutput {
    pub data: Vec<u8>,
    /// The metric of each new glyph.
    pub metrics: Vec<Metric>,
}

pub(crate) fn subset(font: &Font, mapper: &GlyphRemapper) -> Result<HmtxOutput> {
    let hmtx = font.expect_table(Tag::HMTX)?;
    let num_h_metrics = num_h_metrics(font)?;

    let metrics = mapper
        .remapped_gids()
        .map(|old_gid| metric(hmtx, num_h_metrics, old_gid))
        .collect::<Result<Vec<_>>>()?;

    let mut sub_hmtx = Writer::with_capacity(4 * metrics.len());
    for metric in &metrics {
        sub_hmtx.write::<u16>(metric.advance);
        sub_hmtx.write::<i16>(metric.lsb);
    }

    Ok(HmtxOutput { data: sub_hmtx.finish(), metrics })
}
