//! The `hhea` table summarizes the horizontal metrics. Everything that is
//! derived from individual glyphs is recalculated for the retained glyphs.

use crate::glyf::GlyfOutput;
use crate::hmtx::HmtxOutput;
use crate::stream::{read_at, Writer};
use crate::Error::MalformedFont;
use crate::{Font, Result, Tag};

/// Minimum left and right side bearing and maximum extent over all glyphs
/// that have an outline.
fn bearings(metrics: &HmtxOutput, outlines: &GlyfOutput) -> Option<(i16, i16, i16)> {
    let mut result: Option<(i32, i32, i32)> = None;

    for (metric, bbox) in metrics.metrics.iter().zip(&outlines.bboxes) {
        let Some(bbox) = bbox else { continue };
        let width = i32::from(bbox.x_max) - i32::from(bbox.x_min);
        let lsb = i32::from(metric.lsb);
        let rsb = i32::from(metric.advance) - lsb - width;
        let extent = lsb + width;

        result = Some(match result {
            Some((min_lsb, min_rsb, max_extent)) => {
                (min_lsb.min(lsb), min_rsb.min(rsb), max_extent.max(extent))
            }
            None => (lsb, rsb, extent),
        });
    }

    let clamp = |v: i32| v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
    result.map(|(lsb, rsb, extent)| (clamp(lsb), clamp(rsb), clamp(extent)))
}

pub(crate) fn subset(
    font: &Font,
    metrics: &HmtxOutput,
    outlines: &GlyfOutput,
) -> Result<Vec<u8>> {
    let hhea = font.expect_table(Tag::HHEA)?;
    if hhea.len() < 36 {
        return Err(MalformedFont);
    }

    let advance_width_max =
        metrics.metrics.iter().map(|metric| metric.advance).max().unwrap_or(0);

    // Without any outline, the old values are as good as any.
    let (min_lsb, min_rsb, x_max_extent) = match bearings(metrics, outlines) {
        Some(bearings) => bearings,
        None => (
            read_at::<i16>(hhea, 12).ok_or(MalformedFont)?,
            read_at::<i16>(hhea, 14).ok_or(MalformedFont)?,
            read_at::<i16>(hhea, 16).ok_or(MalformedFont)?,
        ),
    };

    let mut sub_hhea = Writer::with_capacity(hhea.len());
    sub_hhea.extend(&hhea[..10]);
    sub_hhea.write::<u16>(advance_width_max);
    sub_hhea.write::<i16>(min_lsb);
    sub_hhea.write::<i16>(min_rsb);
    sub_hhea.write::<i16>(x_max_extent);
    sub_hhea.extend(&hhea[18..34]);
    // Every glyph gets a long metric.
    sub_hhea.write::<u16>(metrics.metrics.len() as u16);
    sub_hhea.extend(&hhea[36..]);

    Ok(sub_hhea.finish())
}
