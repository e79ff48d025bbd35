use crate::cmap::{self, CharMap};
use crate::directory::construct;
use crate::glyf::{self, Glyf, GlyfOutput};
use crate::hmtx::{self, HmtxOutput};
use crate::usage::{Mapping, UsedSet};
use crate::Error::MissingCharMap;
use crate::{head, hhea, kern, maxp, name, os2, post};
use crate::{Encoding, Font, GlyphRemapper, Result, SubsetTag, Tag};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// The tables a subset font can contain. Everything else is dropped.
const TABLES: [Tag; 15] = [
    Tag::GLYF,
    Tag::LOCA,
    Tag::HMTX,
    Tag::HHEA,
    Tag::HEAD,
    Tag::MAXP,
    Tag::OS2,
    Tag::NAME,
    Tag::POST,
    Tag::CMAP,
    Tag::KERN,
    // Hinting data is not tied to specific glyphs and is kept as is.
    Tag::CVT,
    Tag::FPGM,
    Tag::PREP,
    Tag::GASP,
];

/// A subset of a font under construction.
///
/// Characters are added with [`include`](Self::include) and the subset font
/// is produced by [`encode`](Self::encode), which can be called any number of
/// times, also between further inclusions. Encoding the same set of
/// characters always yields the same bytes.
///
/// ```no_run
/// use fontsubset::{Encoding, Font, Subset};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = std::fs::read("fonts/NotoSans-Regular.ttf")?;
/// let font = Font::parse(&data, 0)?;
///
/// let mut subset = Subset::new(&font, Encoding::Unicode)?;
/// for c in "Hello".chars() {
///     subset.include(u32::from(c))?;
/// }
///
/// std::fs::write("target/Noto-Hello.ttf", subset.encode()?)?;
/// # Ok(())
/// # }
/// ```
pub struct Subset<'a> {
    font: &'a Font<'a>,
    encoding: Encoding,
    charmap: CharMap<'a>,
    num_glyphs: u16,
    used: UsedSet,
    /// Computed on demand and thrown away whenever a new character is used.
    resolution: Option<Resolution>,
}

/// The glyphs of the used characters and everything derived from them.
struct Resolution {
    mappings: Vec<Mapping>,
    mapper: GlyphRemapper,
    tag: SubsetTag,
}

impl<'a> Subset<'a> {
    /// Start a new, empty subset of a font.
    ///
    /// Fails if the font has no character map that can serve the encoding.
    pub fn new(font: &'a Font<'a>, encoding: Encoding) -> Result<Self> {
        let charmap = CharMap::parse(font.expect_table(Tag::CMAP)?)?;
        if !charmap.supports(encoding) {
            return Err(MissingCharMap(encoding));
        }

        Ok(Self {
            font,
            encoding,
            charmap,
            num_glyphs: font.num_glyphs()?,
            used: UsedSet::new(encoding),
            resolution: None,
        })
    }

    /// The encoding profile of this subset.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Mark a Unicode character as used.
    ///
    /// Using a character twice has no effect. For [`Encoding::Unicode8Bit`],
    /// this fails once all 8-bit codes are taken.
    pub fn include(&mut self, unicode: u32) -> Result<()> {
        if self.used.insert(unicode)? {
            self.resolution = None;
        }
        Ok(())
    }

    /// Whether a Unicode character was marked as used.
    pub fn includes(&self, unicode: u32) -> bool {
        self.used.contains(unicode)
    }

    /// The code of each used character in the subset font, mapped to the
    /// character. Useful to build a `ToUnicode` map when embedding the font.
    pub fn to_unicode_map(&self) -> BTreeMap<u32, u32> {
        self.used.to_unicode_map()
    }

    /// The mapping from the glyph IDs of the source font to the glyph IDs
    /// of the subset font.
    pub fn glyph_mapping(&mut self) -> Result<&GlyphRemapper> {
        Ok(&self.resolve()?.mapper)
    }

    /// The tag that the subset font's names are prefixed with.
    pub fn subset_tag(&mut self) -> Result<SubsetTag> {
        Ok(self.resolve()?.tag)
    }

    /// Build the subset font.
    pub fn encode(&mut self) -> Result<Vec<u8>> {
        let font = self.font;
        let encoding = self.encoding;
        let num_glyphs = self.num_glyphs;
        let resolution = self.resolve()?;

        let glyf = Glyf::parse(font, num_glyphs)?;
        let ctx = Context::new(font, encoding, &glyf, resolution)?;

        let mut tables = Vec::with_capacity(TABLES.len());
        for tag in TABLES {
            if let Some(data) = ctx.process(tag)? {
                tables.push((tag, data));
            }
        }

        for tag in font.tags().filter(|tag| !TABLES.contains(tag)) {
            log::debug!("dropping {tag} table");
        }

        log::debug!(
            "{}: {} of {} glyphs, {} tables",
            resolution.tag,
            resolution.mapper.num_gids(),
            num_glyphs,
            tables.len()
        );

        Ok(construct(font.scaler_type(), tables))
    }

    fn resolve(&mut self) -> Result<&Resolution> {
        let resolution = match self.resolution.take() {
            Some(resolution) => resolution,
            None => self.compute()?,
        };

        Ok(self.resolution.insert(resolution))
    }

    fn compute(&self) -> Result<Resolution> {
        let mappings = self.used.resolve(&self.charmap, self.num_glyphs)?;

        let glyf = Glyf::parse(self.font, self.num_glyphs)?;
        let glyphs = glyf::closure(
            &glyf,
            self.num_glyphs,
            mappings.iter().map(|mapping| mapping.old_gid),
        )?;
        let mapper = GlyphRemapper::new_from_glyphs(&glyphs.into_iter().collect::<Vec<_>>());

        // Sorted by character, so the tag doesn't depend on the codes that
        // `unicode_8bit` assigns in order of use.
        let mut characters = mappings
            .iter()
            .map(|mapping| (mapping.unicode, mapping.old_gid))
            .collect::<Vec<_>>();
        characters.sort_unstable();
        let tag = SubsetTag::new(self.encoding, &characters, &mapper);

        Ok(Resolution { mappings, mapper, tag })
    }
}

/// Everything the table rewriters need. Each rewriter gets what it reads
/// passed explicitly and returns the bytes of its new table.
struct Context<'a> {
    font: &'a Font<'a>,
    encoding: Encoding,
    mapper: &'a GlyphRemapper,
    tag: SubsetTag,
    /// `(code, new glyph)` pairs, sorted by code.
    cmap: Vec<(u32, u16)>,
    outlines: GlyfOutput,
    metrics: HmtxOutput,
}

impl<'a> Context<'a> {
    fn new(
        font: &'a Font<'a>,
        encoding: Encoding,
        glyf: &Glyf,
        resolution: &'a Resolution,
    ) -> Result<Self> {
        let mapper = &resolution.mapper;

        // Every resolved glyph is part of the closure.
        let cmap = resolution
            .mappings
            .iter()
            .filter_map(|mapping| Some((mapping.code, mapper.get(mapping.old_gid)?)))
            .collect();

        Ok(Self {
            font,
            encoding,
            mapper,
            tag: resolution.tag,
            cmap,
            outlines: glyf::subset(glyf, mapper)?,
            metrics: hmtx::subset(font, mapper)?,
        })
    }

    /// Rewrite a table. Returns `None` if the table doesn't go into the
    /// subset font.
    fn process(&self, tag: Tag) -> Result<Option<Cow<'_, [u8]>>> {
        // Empty optional tables are treated as absent.
        let optional = self.font.table(tag).filter(|data| !data.is_empty());

        let data: Cow<[u8]> = match tag {
            Tag::GLYF => Cow::Borrowed(&self.outlines.glyf),
            Tag::LOCA => Cow::Borrowed(&self.outlines.loca),
            Tag::HMTX => Cow::Borrowed(&self.metrics.data),
            Tag::HEAD => head::subset(self.font, &self.outlines)?.into(),
            Tag::HHEA => hhea::subset(self.font, &self.metrics, &self.outlines)?.into(),
            Tag::MAXP => {
                maxp::subset(self.font, self.mapper.num_gids(), &self.outlines.maxp)?.into()
            }
            Tag::CMAP => cmap::subset(self.encoding, &self.cmap).into(),
            Tag::OS2 => {
                let Some(os2) = optional else { return Ok(None) };
                let codes = self.cmap.iter().map(|&(code, _)| code).collect::<Vec<_>>();
                os2::subset(os2, &codes, &self.metrics.metrics)?.into()
            }
            Tag::NAME => {
                let Some(name) = optional else { return Ok(None) };
                name::subset(name, &self.tag)?.into()
            }
            Tag::POST => {
                let Some(post) = optional else { return Ok(None) };
                post::subset(post, self.mapper)?.into()
            }
            Tag::KERN => {
                let Some(kern) = optional else { return Ok(None) };
                match kern::subset(kern, self.mapper)? {
                    Some(data) => data.into(),
                    None => return Ok(None),
                }
            }
            _ => match self.font.table(tag) {
                Some(data) => Cow::Borrowed(data),
                None => return Ok(None),
            },
        };

        Ok(Some(data))
    }
}
