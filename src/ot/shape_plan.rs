//! Replaces the original FFI-backed shape-plan handle (a wrapper around a
//! `hb_ot_shape_plan_t*`) with a trait-based seam: callers implement
//! [`FeatureQuery`]/[`GlyphIndexResolver`] against their own font or
//! layout-table representation instead of handing this crate a pointer
//! into one. Font parsing and GSUB/GPOS table decoding stay firmly out of
//! scope (`spec.md` §3's Non-goals).

use std::fmt;

/// An OpenType script tag, e.g. `arab`, `latn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptTag(pub [u8; 4]);

impl ScriptTag {
    pub const ARABIC: ScriptTag = ScriptTag(*b"arab");
    pub const LATIN: ScriptTag = ScriptTag(*b"latn");

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl fmt::Display for ScriptTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An OpenType feature tag, e.g. `liga`, `rlig`, `isol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureTag(pub [u8; 4]);

impl FeatureTag {
    pub const ISOLATED_FORMS: FeatureTag = FeatureTag(*b"isol");
    pub const INITIAL_FORMS: FeatureTag = FeatureTag(*b"init");
    pub const MEDIAL_FORMS: FeatureTag = FeatureTag(*b"medi");
    pub const FINAL_FORMS: FeatureTag = FeatureTag(*b"fina");
    pub const REQUIRED_LIGATURES: FeatureTag = FeatureTag(*b"rlig");
    pub const STANDARD_LIGATURES: FeatureTag = FeatureTag(*b"liga");

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a [`LookupMatch`] replaces its input glyph(s) with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitution {
    /// A single-glyph substitution, e.g. one Arabic positional form.
    Single(u32),
    /// A many-to-one ligature substitution.
    Ligature(u32),
}

/// A successful GSUB lookup starting at the queried glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupMatch {
    /// How many consecutive input glyphs this lookup consumes.
    pub input_len: usize,
    /// The glyph(s) the match substitutes in.
    pub substitution: Substitution,
}

/// The font-decoder seam for GSUB lookups (`spec.md` §6). A caller
/// implements this against whatever font or layout-table representation it
/// already has; this crate never parses font files itself.
pub trait FeatureQuery {
    /// Whether `script` exposes a `feature` the caller's data actually
    /// defines a lookup for, not merely whether the tag is a known
    /// OpenType constant.
    fn supports(&self, script: ScriptTag, feature: FeatureTag) -> bool;

    /// Look up a substitution for `feature` anchored at `glyphs[0]`, given
    /// the glyphs that follow it (needed for multi-glyph ligature
    /// matches). Returns `None` if no lookup matches at this position.
    fn lookup(&self, script: ScriptTag, feature: FeatureTag, glyphs: &[u32]) -> Option<LookupMatch>;
}

/// The font-decoder seam mapping characters to glyph ids, independent of
/// any particular feature.
pub trait GlyphIndexResolver {
    fn char_to_glyph_index(&self, c: char) -> u32;
}

/// One entry of `Bidi::apply_features`'s request list: the feature tags a
/// caller wants applied for a given script. The Rust realization of
/// `applyFeatures(font, [{script, tags}...])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFeatures {
    pub script: ScriptTag,
    pub tags: Vec<FeatureTag>,
}

impl ScriptFeatures {
    pub fn new(script: ScriptTag, tags: Vec<FeatureTag>) -> Self {
        ScriptFeatures { script, tags }
    }
}
