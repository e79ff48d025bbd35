//! The `head` table mostly contains information that can be reused from the
//! old table, except for the `loca` format, which depends on the size of the
//! glyph data, and the bounding box of all glyphs. The checksum will be
//! recalculated in the very end.

use crate::glyf::GlyfOutput;
use crate::Error::MalformedFont;
use crate::{Font, Result, Tag};

pub(crate) fn subset(font: &Font, outlines: &GlyfOutput) -> Result<Vec<u8>> {
    let mut head = font.expect_table(Tag::HEAD)?.to_vec();
    if head.len() < 54 {
        return Err(MalformedFont);
    }

    // Placeholder for the checksum adjustment.
    head[8..12].fill(0);

    if let Some(bbox) = outlines.bbox() {
        head[36..38].copy_from_slice(&bbox.x_min.to_be_bytes());
        head[38..40].copy_from_slice(&bbox.y_min.to_be_bytes());
        head[40..42].copy_from_slice(&bbox.x_max.to_be_bytes());
        head[42..44].copy_from_slice(&bbox.y_max.to_be_bytes());
    }

    let index_to_loc = i16::from(outlines.long_loca);
    head[50..52].copy_from_slice(&index_to_loc.to_be_bytes());

    Ok(head)
}
