/*!
Reduces TrueType fonts to the glyphs of the characters a document actually
uses.

# Example
In the example below, we build a subset that only covers the letters of
"Hello". The subset font keeps the metrics and names of the original, but its
glyphs are renumbered and its names carry a tag like `ABCDEF+` that is unique
to this selection of glyphs.

```no_run
use fontsubset::{Encoding, Font, Subset};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
// Read the raw font data.
let data = std::fs::read("fonts/NotoSans-Regular.ttf")?;
let font = Font::parse(&data, 0)?;

// Mark the used characters.
let mut subset = Subset::new(&font, Encoding::Unicode)?;
for c in "Hello".chars() {
    subset.include(u32::from(c))?;
}

// Write the resulting file.
std::fs::write("target/Noto-Small.ttf", subset.encode()?)?;
println!("{}", subset.subset_tag()?);
# Ok(())
# }
```

Unlike subsetters that only blank out unused outlines, glyphs really are
removed and the remaining ones get new, consecutive IDs in the order of their
old IDs. [`Subset::glyph_mapping`] tells you which old glyph became which new
one.

The character map of the subset depends on the [`Encoding`]: with
[`Encoding::Unicode`], characters keep their code points, the other profiles
produce single-byte codes, which is what simple fonts in PDF files need.

Layout tables like `GSUB` and `GPOS` are not subsetted and are dropped, as
are outlines in other formats than TrueType.
*/

#![deny(unsafe_code)]
#![deny(missing_docs)]

mod cmap;
mod directory;
mod encoding;
mod font;
mod glyf;
mod head;
mod hhea;
mod hmtx;
mod kern;
mod maxp;
mod name;
mod namer;
mod os2;
mod post;
mod remapper;
mod stream;
mod subset;
mod usage;
mod util;

pub use crate::directory::{checksum, SearchParams};
pub use crate::encoding::Encoding;
pub use crate::font::Font;
pub use crate::namer::SubsetTag;
pub use crate::remapper::GlyphRemapper;
pub use crate::subset::Subset;

use crate::stream::{Readable, Reader, Writeable, Writer};
use std::fmt::{self, Debug, Display, Formatter};

/// A 4-byte OpenType tag.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Tag(pub [u8; 4]);

#[allow(missing_docs)]
impl Tag {
    // General tables.
    pub const CMAP: Self = Self(*b"cmap");
    pub const HEAD: Self = Self(*b"head");
    pub const HHEA: Self = Self(*b"hhea");
    pub const HMTX: Self = Self(*b"hmtx");
    pub const MAXP: Self = Self(*b"maxp");
    pub const NAME: Self = Self(*b"name");
    pub const OS2: Self = Self(*b"OS/2");
    pub const POST: Self = Self(*b"post");
    pub const KERN: Self = Self(*b"kern");

    // TrueType.
    pub const GLYF: Self = Self(*b"glyf");
    pub const LOCA: Self = Self(*b"loca");
    pub const PREP: Self = Self(*b"prep");
    pub const FPGM: Self = Self(*b"fpgm");
    pub const CVT: Self = Self(*b"cvt ");
    pub const GASP: Self = Self(*b"gasp");
}

impl Readable<'_> for Tag {
    const SIZE: usize = 4;

    fn read(r: &mut Reader) -> Option<Self> {
        r.read::<[u8; 4]>().map(Self)
    }
}

impl Writeable for Tag {
    fn write(&self, w: &mut Writer) {
        w.write::<[u8; 4]>(self.0)
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(std::str::from_utf8(&self.0).unwrap_or("..."))
    }
}

/// The result type for everything.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that occurred while reading a font or building a subset.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// The file contains an unknown kind of font.
    UnknownKind,
    /// The font data is truncated or otherwise unreadable.
    MalformedFont,
    /// A table that is needed for subsetting is missing.
    MissingTable(Tag),
    /// The font has no character map that can serve the encoding profile.
    MissingCharMap(Encoding),
    /// The name of an encoding profile wasn't recognized.
    UnknownEncoding,
    /// A composite glyph references a glyph that doesn't exist.
    InvalidComponent {
        /// The composite glyph.
        glyph: u16,
        /// The referenced glyph.
        component: u16,
    },
    /// The `loca` table places a glyph before its predecessor.
    InvalidLocation(u16),
    /// All 8-bit codes of a [`Encoding::Unicode8Bit`] subset are taken.
    EncodingFull,
    /// A value of the subset font doesn't fit into its field.
    OverflowError,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::UnknownKind => f.pad("unknown font kind"),
            Self::MalformedFont => f.pad("malformed font"),
            Self::MissingTable(tag) => write!(f, "missing {tag} table"),
            Self::MissingCharMap(encoding) => {
                write!(f, "font has no character map for {encoding}")
            }
            Self::UnknownEncoding => f.pad("unknown encoding"),
            Self::InvalidComponent { glyph, component } => {
                write!(f, "glyph {glyph} references missing glyph {component}")
            }
            Self::InvalidLocation(glyph) => write!(f, "invalid location of glyph {glyph}"),
            Self::EncodingFull => f.pad("no 8-bit codes left"),
            Self::OverflowError => f.pad("overflow error"),
        }
    }
}

impl std::error::Error for Error {}
