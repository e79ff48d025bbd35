//! The `glyf` table contains the main description of the glyphs. In order to
//! subset it, there are 5 things we need to do:
//! 1. We need to form the glyph closure. Glyphs can reference other glyphs, meaning that
//!    if a user for example requests the glyph 1, and this glyph references the glyph 2, then
//!    we need to include both of them in our subset.
//! 2. We need to remove glyph descriptions that are not needed for the subset, and reorder
//!    the existing glyph descriptions to match the order defined by the remapper.
//! 3. For component glyphs, we need to rewrite their description so that they reference
//!    the new glyph ID of the glyphs they reference.
//! 4. We need to calculate which format to use in the `loca` table.
//! 5. We need to update the `loca` table itself with the new offsets.
//!
//! Along the way we collect the per-glyph numbers that `head`, `hhea` and
//! `maxp` derive from the outlines.

use crate::stream::{read_at, Reader, Writer};
use crate::Error::{InvalidComponent, InvalidLocation, MalformedFont};
use crate::{Font, GlyphRemapper, Result, Tag};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// The largest `glyf` size that the short `loca` format can address.
const MAX_SHORT_LOCA_SIZE: usize = 2 * u16::MAX as usize;

/// A glyph bounding box.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct BBox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl BBox {
    pub fn union(self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

/// The shape of one glyph description.
enum Description {
    /// A glyph without outline, e.g. the space.
    Empty,
    Simple { points: u16, contours: u16 },
    /// A composite glyph, with the position and value of each component's
    /// glyph index.
    Composite(Vec<(usize, u16)>),
}

/// The `glyf` table together with its decoded `loca` offsets.
pub(crate) struct Glyf<'a> {
    data: &'a [u8],
    offsets: Vec<u32>,
}

impl<'a> Glyf<'a> {
    /// Read `glyf` and `loca`, checking that every glyph lies within the table
    /// and that the offsets never decrease.
    pub fn parse(font: &Font<'a>, num_glyphs: u16) -> Result<Self> {
        let head = font.expect_table(Tag::HEAD)?;
        let loca = font.expect_table(Tag::LOCA)?;
        let data = font.expect_table(Tag::GLYF)?;

        let long = read_at::<i16>(head, 50).ok_or(MalformedFont)? != 0;
        let count = usize::from(num_glyphs) + 1;

        let mut r = Reader::new(loca);
        let offsets = if long {
            r.read_vector::<u32>(count)
        } else {
            r.read_vector::<u16>(count)
                .map(|offsets| offsets.into_iter().map(|o| 2 * u32::from(o)).collect())
        }
        .ok_or(MalformedFont)?;

        for (gid, pair) in offsets.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(InvalidLocation(gid as u16));
            }
        }

        if offsets.last().is_some_and(|&end| end as usize > data.len()) {
            return Err(MalformedFont);
        }

        Ok(Self { data, offsets })
    }

    /// The raw description of a glyph. Empty for glyphs without outline.
    fn glyph_data(&self, gid: u16) -> Result<&'a [u8]> {
        let index = usize::from(gid);
        let start = *self.offsets.get(index).ok_or(MalformedFont)? as usize;
        let end = *self.offsets.get(index + 1).ok_or(MalformedFont)? as usize;
        self.data.get(start..end).ok_or(MalformedFont)
    }

    fn describe(&self, gid: u16) -> Result<Description> {
        let data = self.glyph_data(gid)?;
        if data.is_empty() {
            return Ok(Description::Empty);
        }

        let num_contours = read_at::<i16>(data, 0).ok_or(MalformedFont)?;
        if num_contours < 0 {
            return components(data).map(Description::Composite).ok_or(MalformedFont);
        }

        let contours = num_contours as u16;
        let points = match contours {
            0 => 0,
            n => {
                let last_end = read_at::<u16>(data, 10 + 2 * (usize::from(n) - 1))
                    .ok_or(MalformedFont)?;
                last_end.saturating_add(1)
            }
        };

        Ok(Description::Simple { points, contours })
    }

    fn bbox(&self, gid: u16) -> Result<Option<BBox>> {
        let data = self.glyph_data(gid)?;
        if data.is_empty() {
            return Ok(None);
        }

        let mut r = Reader::new_at(data, 2);
        let mut read = || r.read::<i16>().ok_or(MalformedFont);
        Ok(Some(BBox { x_min: read()?, y_min: read()?, x_max: read()?, y_max: read()? }))
    }
}

/// Walk the components of a composite glyph description.
fn components(data: &[u8]) -> Option<Vec<(usize, u16)>> {
    let mut r = Reader::new_at(data, 10);
    let mut components = vec![];

    loop {
        let flags = r.read::<u16>()?;
        let position = r.offset();
        components.push((position, r.read::<u16>()?));

        let arg_size = if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        let transform_size = if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            8
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            4
        } else if flags & WE_HAVE_A_SCALE != 0 {
            2
        } else {
            0
        };
        r.skip_bytes(arg_size + transform_size)?;

        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }

    Some(components)
}

/// Extend a set of glyphs with everything their composite glyphs reference.
///
/// Every glyph is expanded at most once, so cyclic references terminate.
pub(crate) fn closure(
    glyf: &Glyf,
    num_glyphs: u16,
    glyphs: impl IntoIterator<Item = u16>,
) -> Result<BTreeSet<u16>> {
    let mut visited = BTreeSet::new();
    let mut stack = vec![0];
    stack.extend(glyphs);

    while let Some(gid) = stack.pop() {
        if !visited.insert(gid) {
            continue;
        }

        if let Description::Composite(components) = glyf.describe(gid)? {
            for (_, component) in components {
                if component >= num_glyphs {
                    return Err(InvalidComponent { glyph: gid, component });
                }

                if !visited.contains(&component) {
                    stack.push(component);
                }
            }
        }
    }

    Ok(visited)
}

/// The `maxp` version 1.0 fields that depend on the glyph outlines.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub(crate) struct MaxpStats {
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_component_elements: u16,
    pub max_component_depth: u16,
}

/// Points, contours and nesting depth of a glyph with all components
/// resolved.
#[derive(Debug, Default, Copy, Clone)]
struct Totals {
    points: u16,
    contours: u16,
    depth: u16,
}

impl Totals {
    fn add(&mut self, child: Totals) {
        self.points = self.points.saturating_add(child.points);
        self.contours = self.contours.saturating_add(child.contours);
        self.depth = self.depth.max(child.depth);
    }
}

/// A composite glyph whose components are being summed up.
struct Frame {
    gid: u16,
    components: Vec<u16>,
    next: usize,
    /// The sum over the finished components, with their maximum depth.
    sum: Totals,
}

/// What to do with a glyph while walking a component tree.
enum Step {
    Done(Totals),
    Descend(Vec<u16>),
}

/// Resolve the totals of a glyph.
///
/// Nesting can be as deep as the font has glyphs, so the component tree is
/// walked with an explicit stack. A glyph that (indirectly) contains itself
/// contributes nothing more.
fn totals(glyf: &Glyf, gid: u16, memo: &mut FxHashMap<u16, Totals>) -> Result<Totals> {
    let mut on_stack = FxHashSet::default();
    let components = match step(glyf, gid, memo, &on_stack)? {
        Step::Done(totals) => return Ok(totals),
        Step::Descend(components) => components,
    };

    on_stack.insert(gid);
    let mut stack = vec![Frame { gid, components, next: 0, sum: Totals::default() }];

    while let Some(frame) = stack.last_mut() {
        if let Some(&child) = frame.components.get(frame.next) {
            frame.next += 1;
            match step(glyf, child, memo, &on_stack)? {
                Step::Done(totals) => frame.sum.add(totals),
                Step::Descend(components) => {
                    on_stack.insert(child);
                    stack.push(Frame { gid: child, components, next: 0, sum: Totals::default() });
                }
            }
            continue;
        }

        let resolved = Totals { depth: frame.sum.depth.saturating_add(1), ..frame.sum };
        let done = frame.gid;
        stack.pop();
        on_stack.remove(&done);
        memo.insert(done, resolved);

        match stack.last_mut() {
            Some(parent) => parent.sum.add(resolved),
            None => return Ok(resolved),
        }
    }

    Ok(Totals::default())
}

fn step(
    glyf: &Glyf,
    gid: u16,
    memo: &FxHashMap<u16, Totals>,
    on_stack: &FxHashSet<u16>,
) -> Result<Step> {
    if let Some(totals) = memo.get(&gid) {
        return Ok(Step::Done(*totals));
    }

    if on_stack.contains(&gid) {
        return Ok(Step::Done(Totals::default()));
    }

    Ok(match glyf.describe(gid)? {
        Description::Empty => Step::Done(Totals::default()),
        Description::Simple { points, contours } => {
            Step::Done(Totals { points, contours, depth: 0 })
        }
        Description::Composite(components) => {
            Step::Descend(components.into_iter().map(|(_, component)| component).collect())
        }
    })
}

/// The rebuilt `glyf` and `loca` tables plus what other tables need to know
/// about them.
pub(crate) struct GlyfOutput {
    pub glyf: Vec<u8>,
    pub loca: Vec<u8>,
    pub long_loca: bool,
    /// The bounding box of each new glyph, `None` for empty glyphs.
    pub bboxes: Vec<Option<BBox>>,
    pub maxp: MaxpStats,
}

impl GlyfOutput {
    /// The union of all glyph bounding boxes.
    pub fn bbox(&self) -> Option<BBox> {
        self.bboxes.iter().flatten().copied().reduce(BBox::union)
    }
}

pub(crate) fn subset(glyf: &Glyf, mapper: &GlyphRemapper) -> Result<GlyfOutput> {
    let mut entries = Vec::with_capacity(usize::from(mapper.num_gids()));
    let mut bboxes = Vec::with_capacity(usize::from(mapper.num_gids()));
    let mut maxp = MaxpStats::default();
    let mut memo = FxHashMap::default();

    for old_gid in mapper.remapped_gids() {
        let data = glyf.glyph_data(old_gid)?;
        bboxes.push(glyf.bbox(old_gid)?);

        match glyf.describe(old_gid)? {
            Description::Empty => entries.push(Vec::new()),
            Description::Simple { points, contours } => {
                maxp.max_points = maxp.max_points.max(points);
                maxp.max_contours = maxp.max_contours.max(contours);
                entries.push(data.to_vec());
            }
            Description::Composite(components) => {
                let mut entry = data.to_vec();
                for &(position, component) in &components {
                    let new_gid = mapper
                        .get(component)
                        .ok_or(InvalidComponent { glyph: old_gid, component })?;
                    entry[position..position + 2].copy_from_slice(&new_gid.to_be_bytes());
                }

                let resolved = totals(glyf, old_gid, &mut memo)?;
                maxp.max_composite_points = maxp.max_composite_points.max(resolved.points);
                maxp.max_composite_contours =
                    maxp.max_composite_contours.max(resolved.contours);
                maxp.max_component_elements =
                    maxp.max_component_elements.max(components.len() as u16);
                maxp.max_component_depth = maxp.max_component_depth.max(resolved.depth);
                entries.push(entry);
            }
        }
    }

    // Each entry is padded to an even length, which the short format needs.
    let size: usize = entries.iter().map(|entry| entry.len().next_multiple_of(2)).sum();
    let long_loca = size > MAX_SHORT_LOCA_SIZE;

    let mut sub_glyf = Writer::with_capacity(size);
    let mut sub_loca = Writer::new();

    let mut write_offset = |offset: usize| {
        if long_loca {
            sub_loca.write::<u32>(offset as u32);
        } else {
            sub_loca.write::<u16>((offset / 2) as u16);
        }
    };

    for entry in &entries {
        write_offset(sub_glyf.len());
        sub_glyf.extend(entry);
        sub_glyf.align(2);
    }

    // Write the final offset.
    write_offset(sub_glyf.len());

    log::debug!(
        "glyf: {} glyphs, {} bytes, {} loca",
        entries.len(),
        size,
        if long_loca { "long" } else { "short" }
    );

    Ok(GlyfOutput {
        glyf: sub_glyf.finish(),
        loca: sub_loca.finish(),
        long_loca,
        bboxes,
        maxp,
    })
}
