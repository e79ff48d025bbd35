use crate::glyf::MaxpStats;
use crate::stream::{Reader, Writer};
use crate::Error::MalformedFont;
use crate::{Font, Result, Tag};

/// Version 1.0 is the one used by fonts with TrueType outlines. Version 0.5
/// only stores the glyph count.
const VERSION_1: u32 = 0x00010000;

pub(crate) fn subset(font: &Font, num_glyphs: u16, stats: &MaxpStats) -> Result<Vec<u8>> {
    let maxp = font.expect_table(Tag::MAXP)?;
    let mut r = Reader::new(maxp);
    let version = r.read::<u32>().ok_or(MalformedFont)?;
    r.read::<u16>().ok_or(MalformedFont)?; // num glyphs

    let mut sub_maxp = Writer::new();
    sub_maxp.write::<u32>(version);
    sub_maxp.write::<u16>(num_glyphs);

    if version == VERSION_1 {
        sub_maxp.write::<u16>(stats.max_points);
        sub_maxp.write::<u16>(stats.max_contours);
        sub_maxp.write::<u16>(stats.max_composite_points);
        sub_maxp.write::<u16>(stats.max_composite_contours);
        r.skip_bytes(8).ok_or(MalformedFont)?;

        // Zones, twilight points, storage, function and instruction defs,
        // stack elements and instruction size only concern the hinting
        // programs, which are kept as they are.
        sub_maxp.extend(r.read_bytes(14).ok_or(MalformedFont)?);

        sub_maxp.write::<u16>(stats.max_component_elements);
        sub_maxp.write::<u16>(stats.max_component_depth);
        r.skip_bytes(4).ok_or(MalformedFont)?;
        sub_maxp.extend(r.tail().ok_or(MalformedFont)?);
    }

    Ok(sub_maxp.finish())
}
