//! Subset fonts are tagged with six uppercase letters, as in `ABCDEF+Sans`,
//! so that readers can tell apart different subsets of the same font.

use crate::{Encoding, GlyphRemapper};
use std::fmt::{self, Debug, Display, Formatter, Write};
use std::hash::Hasher;
use twox_hash::XxHash64;

/// The number of letters in a tag.
const LEN: usize = 6;

/// The tag that identifies one particular subset of a font.
///
/// The tag only depends on what a subset contains: the encoding profile, the
/// used characters with their glyphs and the final glyph set. Two subsets
/// with the same content always get the same tag, no matter in which order
/// the characters were included.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct SubsetTag([u8; LEN]);

impl SubsetTag {
    /// Compute the tag from the `(character, source glyph)` pairs, sorted by
    /// character, and the glyph set.
    pub(crate) fn new(
        encoding: Encoding,
        characters: &[(u32, u16)],
        mapper: &GlyphRemapper,
    ) -> Self {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(&hash_input(encoding, characters, mapper));
        Self::from_hash(hasher.finish())
    }

    fn from_hash(mut hash: u64) -> Self {
        let mut letters = [b'A'; LEN];
        for letter in &mut letters {
            *letter = b'A' + (hash % 26) as u8;
            hash /= 26;
        }
        Self(letters)
    }

    #[cfg(test)]
    pub(crate) fn from_letters(letters: [u8; LEN]) -> Self {
        Self(letters)
    }

    /// The tag's letters.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The prefix for names of the subset font: the tag followed by `+`.
    pub(crate) fn prefix(&self) -> String {
        format!("{self}+")
    }
}

/// The bytes a tag is hashed from. Every value has a fixed width and byte
/// order, so the tag is the same on every platform.
fn hash_input(
    encoding: Encoding,
    characters: &[(u32, u16)],
    mapper: &GlyphRemapper,
) -> Vec<u8> {
    let mut input = vec![encoding as u8];
    input.extend((characters.len() as u32).to_le_bytes());
    for &(unicode, gid) in characters {
        input.extend(unicode.to_le_bytes());
        input.extend(gid.to_le_bytes());
    }
    for gid in mapper.remapped_gids() {
        input.extend(gid.to_le_bytes());
    }
    input
}

impl Debug for SubsetTag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "SubsetTag({self})")
    }
}

impl Display for SubsetTag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.iter().try_for_each(|&letter| f.write_char(char::from(letter)))
    }
}
