use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// A remapper that assigns a new, contiguous ordering to a subset of glyphs.
///
/// For example, let's say that we want to subset a font that only contains the
/// glyphs 4, 9 and 16. In this case, the remapper yields the following
/// glyph IDs:
/// 0 -> 0 (The .notdef glyph will always be included)
/// 4 -> 1
/// 9 -> 2
/// 16 -> 3
///
/// The mapping is order-preserving: a smaller old ID always maps to a smaller
/// new ID. Old and new IDs live in different namespaces and are only ever
/// converted through this type.
#[derive(Debug, Clone)]
pub struct GlyphRemapper {
    /// Maps old glyph IDs to new ones.
    forward: FxHashMap<u16, u16>,
    /// The old glyph ID of each new glyph ID.
    backward: Vec<u16>,
}

impl GlyphRemapper {
    /// Create a remapper that only contains the `.notdef` glyph.
    pub fn new() -> Self {
        Self::new_from_glyphs(&[])
    }

    /// Create a remapper from an existing set of glyphs. The `.notdef` glyph
    /// is always added.
    pub fn new_from_glyphs(glyphs: &[u16]) -> Self {
        let mut sorted = BTreeSet::from_iter(glyphs.iter().copied());
        sorted.insert(0);

        let mut forward = FxHashMap::default();
        let mut backward = Vec::with_capacity(sorted.len());

        // At most `u16::MAX + 1` distinct glyphs exist, and glyph 0xFFFF can
        // never be valid because the glyph count itself is a `u16`.
        for (new, old) in sorted.into_iter().enumerate() {
            forward.insert(old, new as u16);
            backward.push(old);
        }

        Self { forward, backward }
    }

    /// Get the new glyph ID of an old one, if it is part of the subset.
    pub fn get(&self, old: u16) -> Option<u16> {
        self.forward.get(&old).copied()
    }

    /// Get the old glyph ID of a new one.
    pub fn get_reverse(&self, new: u16) -> Option<u16> {
        self.backward.get(usize::from(new)).copied()
    }

    /// Whether the old glyph ID is part of the subset.
    pub fn contains(&self, old: u16) -> bool {
        self.forward.contains_key(&old)
    }

    /// The number of glyphs in the subset.
    pub fn num_gids(&self) -> u16 {
        self.backward.len() as u16
    }

    /// Returns an iterator over the old glyph IDs, in ascending order of
    /// their new IDs.
    pub fn remapped_gids(&self) -> impl Iterator<Item = u16> + '_ {
        self.backward.iter().copied()
    }
}

impl Default for GlyphRemapper {
    fn default() -> Self {
        Self::new()
    }
}
