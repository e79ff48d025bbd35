//! Tracks which characters a subset uses and which code each one gets in the
//! subset font.

use crate::cmap::CharMap;
use crate::Error::{EncodingFull, MalformedFont};
use crate::{Encoding, Result};
use std::collections::BTreeMap;

/// The code that `unicode_8bit` reserves for the space character.
const SPACE: u32 = 0x20;

/// The first code `unicode_8bit` hands out to other characters.
const FIRST_FREE_CODE: u16 = 0x21;

/// The set of used characters. It only ever grows.
#[derive(Debug, Clone)]
pub(crate) struct UsedSet {
    encoding: Encoding,
    /// Each used character with its code in the subset font, if it has one.
    codes: BTreeMap<u32, Option<u32>>,
    /// The next code to hand out for `unicode_8bit`.
    next_code: u16,
}

/// A used character together with its code in the subset font and the glyph
/// it maps to in the source font.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Mapping {
    pub unicode: u32,
    pub code: u32,
    pub old_gid: u16,
}

impl UsedSet {
    pub fn new(encoding: Encoding) -> Self {
        Self { encoding, codes: BTreeMap::new(), next_code: FIRST_FREE_CODE }
    }

    /// Mark a character as used. Returns whether it was new.
    pub fn insert(&mut self, unicode: u32) -> Result<bool> {
        if self.codes.contains_key(&unicode) {
            return Ok(false);
        }

        let code = match self.encoding {
            Encoding::Unicode => Some(unicode),
            Encoding::Unicode8Bit if unicode == SPACE => Some(SPACE),
            Encoding::Unicode8Bit => {
                if self.next_code > 0xFF {
                    return Err(EncodingFull);
                }
                let code = u32::from(self.next_code);
                self.next_code += 1;
                Some(code)
            }
            Encoding::MacRoman | Encoding::Windows1252 => {
                self.encoding.from_unicode(unicode).map(u32::from)
            }
        };

        if code.is_none() {
            log::debug!("U+{unicode:04X} has no code in {}", self.encoding);
        }

        self.codes.insert(unicode, code);
        Ok(true)
    }

    pub fn contains(&self, unicode: u32) -> bool {
        self.codes.contains_key(&unicode)
    }

    /// The code of each used character in the subset font, by code.
    pub fn to_unicode_map(&self) -> BTreeMap<u32, u32> {
        self.codes
            .iter()
            .filter_map(|(&unicode, &code)| Some((code?, unicode)))
            .collect()
    }

    /// Look up the source glyph of every used character that has a code.
    /// Characters without a glyph are left out. The result is sorted by
    /// code.
    pub fn resolve(&self, charmap: &CharMap, num_glyphs: u16) -> Result<Vec<Mapping>> {
        let mut mappings = vec![];

        for (&unicode, &code) in &self.codes {
            let Some(code) = code else { continue };
            let byte = self.encoding.from_unicode(unicode);
            let Some(old_gid) = charmap.glyph_index(self.encoding, unicode, byte) else {
                log::debug!("U+{unicode:04X} is not covered by the font");
                continue;
            };

            if old_gid >= num_glyphs {
                return Err(MalformedFont);
            }

            mappings.push(Mapping { unicode, code, old_gid });
        }

        mappings.sort_by_key(|mapping| mapping.code);
        Ok(mappings)
    }
}
