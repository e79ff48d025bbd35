//! Builds small TrueType fonts in memory, so the tests don't depend on font
//! files.
//!
//! The default font has these glyphs:
//!
//! | gid | char     | outline                           |
//! |-----|----------|-----------------------------------|
//! | 0   |          | `.notdef` rectangle               |
//! | 1   | space    | empty                             |
//! | 2   | a        | triangle                          |
//! | 3   | b, é     | rectangle                         |
//! | 4   | c        | composite of 2 and 3              |
//! | 5   | x        | composite that references itself  |
//! | 6   | d, €     | rectangle                         |

#![allow(dead_code)]

pub const NUM_GLYPHS: u16 = 7;

pub const ADVANCES: [u16; 7] = [500, 250, 560, 580, 1200, 600, 600];
pub const BEARINGS: [i16; 7] = [50, 0, 30, 40, 30, 30, 20];

/// The kerning pairs of the font.
pub const KERNING: [(u16, u16, i16); 4] = [(2, 3, -40), (3, 2, -30), (2, 6, -20), (4, 2, 15)];

/// Characters and their glyphs in the font's character map.
pub const CHARS: [(u32, u16); 8] = [
    (0x20, 1),
    (0x61, 2),
    (0x62, 3),
    (0x63, 4),
    (0x64, 6),
    (0x78, 5),
    (0xE9, 3),
    (0x20AC, 6),
];

const ON_CURVE: u8 = 0x01;
const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const ARGS_ARE_XY_VALUES: u16 = 0x0002;
const MORE_COMPONENTS: u16 = 0x0020;

/// Variations of the default font.
#[derive(Debug, Clone)]
pub struct Options {
    pub scaler_type: u32,
    pub long_loca: bool,
    pub kern: bool,
    pub post: bool,
    pub os2: bool,
    pub postscript_name: bool,
    /// Platform and encoding ID of the character map.
    pub cmap_encoding: (u16, u16),
    /// Make the `prep` table empty.
    pub empty_prep: bool,
    /// Let glyph 4 reference the non-existent glyph 42.
    pub bad_component: bool,
    /// Let the `loca` offset of glyph 3 lie before the one of glyph 2.
    pub descending_loca: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            scaler_type: 0x00010000,
            long_loca: false,
            kern: true,
            post: true,
            os2: true,
            postscript_name: true,
            cmap_encoding: (3, 1),
            empty_prep: false,
            bad_component: false,
            descending_loca: false,
        }
    }
}

/// The default font.
pub fn font() -> Vec<u8> {
    build(&Options::default())
}

pub fn build(options: &Options) -> Vec<u8> {
    let glyphs = glyphs(options);
    let (glyf, loca) = glyf_and_loca(&glyphs, options);

    let mut tables: Vec<([u8; 4], Vec<u8>)> = vec![
        (*b"cmap", cmap(options.cmap_encoding)),
        (*b"cvt ", vec![0, 10, 0, 20, 0, 30, 0, 40]),
        (*b"fpgm", vec![0xB0, 0x01, 0x2C]),
        (*b"glyf", glyf),
        (*b"head", head(options.long_loca)),
        (*b"hhea", hhea()),
        (*b"hmtx", hmtx()),
        (*b"loca", loca),
        (*b"maxp", maxp()),
        (*b"name", name(options.postscript_name)),
        (*b"prep", if options.empty_prep { vec![] } else { vec![0xB0, 0x00] }),
        (*b"GSUB", vec![0, 1, 0, 0, 0, 10, 0, 10, 0, 10]),
    ];

    if options.kern {
        tables.push((*b"kern", kern()));
    }
    if options.post {
        tables.push((*b"post", post()));
    }
    if options.os2 {
        tables.push((*b"OS/2", os2()));
    }

    container(options.scaler_type, tables)
}

fn push_u16(data: &mut Vec<u8>, values: &[u16]) {
    values.iter().for_each(|v| data.extend(v.to_be_bytes()));
}

fn push_i16(data: &mut Vec<u8>, values: &[i16]) {
    values.iter().for_each(|v| data.extend(v.to_be_bytes()));
}

/// A simple glyph from closed contours of on-curve points.
fn simple(contours: &[&[(i16, i16)]]) -> Vec<u8> {
    let points = contours.iter().flat_map(|c| c.iter().copied()).collect::<Vec<_>>();
    let x_min = points.iter().map(|p| p.0).min().unwrap_or(0);
    let y_min = points.iter().map(|p| p.1).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
    let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);

    let mut data = vec![];
    push_i16(&mut data, &[contours.len() as i16, x_min, y_min, x_max, y_max]);

    let mut end = 0;
    for contour in contours {
        end += contour.len() as u16;
        push_u16(&mut data, &[end - 1]);
    }

    push_u16(&mut data, &[0]); // instruction length
    data.extend(std::iter::repeat(ON_CURVE).take(points.len()));

    let (mut x, mut y) = (0, 0);
    let mut ys = vec![];
    for &(px, py) in &points {
        push_i16(&mut data, &[px - x]);
        ys.push(py - y);
        (x, y) = (px, py);
    }
    push_i16(&mut data, &ys);

    data
}

fn rectangle(x0: i16, y0: i16, x1: i16, y1: i16) -> Vec<u8> {
    simple(&[&[(x0, y0), (x0, y1), (x1, y1), (x1, y0)]])
}

/// A composite glyph from `(glyph, dx, dy)` components.
fn composite(bbox: [i16; 4], components: &[(u16, i16, i16)]) -> Vec<u8> {
    let mut data = vec![];
    push_i16(&mut data, &[-1]);
    push_i16(&mut data, &bbox);

    for (i, &(glyph, dx, dy)) in components.iter().enumerate() {
        let mut flags = ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES;
        if i + 1 < components.len() {
            flags |= MORE_COMPONENTS;
        }
        push_u16(&mut data, &[flags, glyph]);
        push_i16(&mut data, &[dx, dy]);
    }

    data
}

fn glyphs(options: &Options) -> Vec<Vec<u8>> {
    let c_component = if options.bad_component { 42 } else { 3 };
    vec![
        rectangle(50, 0, 450, 700),
        vec![],
        simple(&[&[(30, 0), (530, 0), (280, 500)]]),
        simple(&[&[(40, 0), (40, 720), (540, 720), (540, 0)], &[(140, 100), (440, 100), (290, 600)]]),
        composite([30, 0, 1140, 720], &[(2, 0, 0), (c_component, 600, 0)]),
        composite([30, 0, 530, 500], &[(2, 0, 0), (5, 0, 0)]),
        rectangle(20, 0, 520, 600),
    ]
}

fn glyf_and_loca(glyphs: &[Vec<u8>], options: &Options) -> (Vec<u8>, Vec<u8>) {
    let mut glyf = vec![];
    let mut offsets = vec![];
    for glyph in glyphs {
        offsets.push(glyf.len() as u32);
        glyf.extend(glyph);
        if glyf.len() % 2 != 0 {
            glyf.push(0);
        }
    }
    offsets.push(glyf.len() as u32);

    if options.descending_loca {
        offsets[3] = 0;
    }

    let mut loca = vec![];
    for offset in offsets {
        if options.long_loca {
            loca.extend(offset.to_be_bytes());
        } else {
            loca.extend(((offset / 2) as u16).to_be_bytes());
        }
    }

    (glyf, loca)
}

fn cmap((platform, encoding): (u16, u16)) -> Vec<u8> {
    let mut chars = CHARS.to_vec();
    chars.sort();

    // One segment per character plus the final one.
    let seg_count = chars.len() as u16 + 1;
    let mut ends = vec![];
    let mut deltas = vec![];
    for &(c, g) in &chars {
        ends.push(c as u16);
        deltas.push(g.wrapping_sub(c as u16));
    }
    ends.push(0xFFFF);
    deltas.push(1);

    let mut subtable = vec![];
    push_u16(&mut subtable, &[4, 16 + 8 * seg_count, 0, 2 * seg_count]);
    let selector = 15 - seg_count.leading_zeros() as u16;
    let range = 2 << selector;
    push_u16(&mut subtable, &[range, selector, 2 * seg_count - range]);
    push_u16(&mut subtable, &ends);
    push_u16(&mut subtable, &[0]);
    push_u16(&mut subtable, &ends);
    push_u16(&mut subtable, &deltas);
    push_u16(&mut subtable, &vec![0; usize::from(seg_count)]);

    let mut data = vec![];
    push_u16(&mut data, &[0, 1, platform, encoding]);
    data.extend(12u32.to_be_bytes());
    data.extend(subtable);
    data
}

fn head(long_loca: bool) -> Vec<u8> {
    let mut data = vec![];
    data.extend(0x00010000u32.to_be_bytes()); // version
    data.extend(0x00010000u32.to_be_bytes()); // revision
    data.extend(0u32.to_be_bytes()); // checksum adjustment
    data.extend(0x5F0F3CF5u32.to_be_bytes());
    push_u16(&mut data, &[0x000B, 1000]); // flags, units per em
    data.extend([0; 16]); // created, modified
    push_i16(&mut data, &[20, 0, 1140, 720]);
    push_u16(&mut data, &[0, 8, 2]); // mac style, lowest ppem, direction
    push_i16(&mut data, &[i16::from(long_loca), 0]);
    data
}

fn hhea() -> Vec<u8> {
    let mut data = vec![];
    data.extend(0x00010000u32.to_be_bytes());
    push_i16(&mut data, &[800, -200, 90]); // ascender, descender, line gap
    push_u16(&mut data, &[1200]);
    push_i16(&mut data, &[0, 10, 1140]); // min lsb, min rsb, max extent
    push_i16(&mut data, &[1, 0, 0, 0, 0, 0, 0]); // caret and reserved
    push_u16(&mut data, &[0, 6]); // metric format, long metrics
    data
}

fn hmtx() -> Vec<u8> {
    let mut data = vec![];
    for i in 0..6 {
        push_u16(&mut data, &[ADVANCES[i]]);
        push_i16(&mut data, &[BEARINGS[i]]);
    }
    // The last glyph shares the advance of glyph 5.
    push_i16(&mut data, &[BEARINGS[6]]);
    data
}

fn maxp() -> Vec<u8> {
    let mut data = vec![];
    data.extend(0x00010000u32.to_be_bytes());
    push_u16(&mut data, &[NUM_GLYPHS, 7, 2, 7, 2, 2, 0, 16, 4, 0, 64, 12, 2, 2]);
    data
}

fn name(postscript_name: bool) -> Vec<u8> {
    let utf16 = |s: &str| s.encode_utf16().flat_map(u16::to_be_bytes).collect::<Vec<_>>();
    let mut records: Vec<(u16, u16, u16, u16, Vec<u8>)> = vec![
        (1, 0, 0, 1, b"Test Sans".to_vec()),
        (3, 1, 0x409, 0, utf16("Copyright nobody")),
        (3, 1, 0x409, 1, utf16("Test Sans")),
        (3, 1, 0x409, 2, utf16("Regular")),
        (3, 1, 0x409, 4, utf16("Test Sans Regular")),
        (3, 1, 0x409, 13, utf16("Some license")),
    ];
    if postscript_name {
        records.push((3, 1, 0x409, 6, utf16("TestSans-Regular")));
    }

    let mut data = vec![];
    let mut storage = vec![];
    push_u16(&mut data, &[0, records.len() as u16, 6 + 12 * records.len() as u16]);
    for (platform, encoding, language, id, string) in records {
        let length = string.len() as u16;
        push_u16(&mut data, &[platform, encoding, language, id, length, storage.len() as u16]);
        storage.extend(string);
    }
    data.extend(storage);
    data
}

fn post() -> Vec<u8> {
    let mut data = vec![];
    data.extend(0x00020000u32.to_be_bytes());
    data.extend(0u32.to_be_bytes()); // italic angle
    push_i16(&mut data, &[-100, 50]);
    data.extend([0; 20]);
    push_u16(&mut data, &[NUM_GLYPHS, 0, 3, 68, 69, 70, 258, 259]);
    data.extend(b"\x07x.cycle\x05d.alt");
    data
}

fn os2() -> Vec<u8> {
    let mut data = vec![];
    push_u16(&mut data, &[4]); // version
    push_i16(&mut data, &[480]); // average width
    push_u16(&mut data, &[400, 5, 0]); // weight, width, fs type
    push_i16(&mut data, &[650, 600, 0, 75, 650, 600, 0, 350, 50, 250]); // sub/superscript
    data.extend([0; 2]); // family class
    data.extend([0; 10]); // panose
    data.extend([0; 16]); // unicode ranges
    data.extend(*b"TEST");
    push_u16(&mut data, &[0x0040, 0x20, 0x20AC]); // selection, char range
    push_i16(&mut data, &[800, -200, 90]); // typographic metrics
    push_u16(&mut data, &[800, 200]); // windows metrics
    data.extend([0; 8]); // code page ranges
    push_i16(&mut data, &[500, 700]); // x height, cap height
    push_u16(&mut data, &[0, 0x20, 2]); // default char, break char, context
    data
}

fn kern() -> Vec<u8> {
    let mut pairs = KERNING.to_vec();
    pairs.sort_by_key(|&(left, right, _)| (left, right));

    let mut data = vec![];
    push_u16(&mut data, &[0, 1]);
    push_u16(&mut data, &[0, 14 + 6 * pairs.len() as u16, 1]);
    push_u16(&mut data, &[pairs.len() as u16, 24, 2, 0]);
    for (left, right, value) in pairs {
        push_u16(&mut data, &[left, right]);
        push_i16(&mut data, &[value]);
    }
    data
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut bytes = [0; 4];
        bytes[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(bytes))
    })
}

fn container(scaler_type: u32, mut tables: Vec<([u8; 4], Vec<u8>)>) -> Vec<u8> {
    tables.sort_by_key(|(tag, _)| *tag);

    let count = tables.len() as u16;
    let selector = 15 - count.leading_zeros() as u16;
    let search_range = 16 << selector;

    let mut data = vec![];
    data.extend(scaler_type.to_be_bytes());
    push_u16(&mut data, &[count, search_range, selector, 16 * count - search_range]);

    let mut offset = 12 + 16 * tables.len();
    for (tag, table) in &tables {
        data.extend(tag);
        data.extend(checksum(table).to_be_bytes());
        data.extend((offset as u32).to_be_bytes());
        data.extend((table.len() as u32).to_be_bytes());
        offset += table.len().next_multiple_of(4);
    }

    for (_, table) in &tables {
        data.extend(table);
        data.resize(data.len().next_multiple_of(4), 0);
    }

    data
}

#[derive(Debug, Default, PartialEq)]
pub struct Sink(pub Vec<Inst>);

#[derive(Debug, PartialEq)]
pub enum Inst {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo(f32, f32, f32, f32),
    CurveTo(f32, f32, f32, f32, f32, f32),
    Close,
}

impl ttf_parser::OutlineBuilder for Sink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.push(Inst::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.push(Inst::LineTo(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.push(Inst::QuadTo(x1, y1, x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.push(Inst::CurveTo(x1, y1, x2, y2, x, y));
    }

    fn close(&mut self) {
        self.0.push(Inst::Close);
    }
}

impl skrifa::outline::OutlinePen for Sink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.push(Inst::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.push(Inst::LineTo(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.push(Inst::QuadTo(x1, y1, x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.push(Inst::CurveTo(x1, y1, x2, y2, x, y));
    }

    fn close(&mut self) {
        self.0.push(Inst::Close);
    }
}
