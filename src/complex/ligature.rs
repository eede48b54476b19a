//! The ligature-substitution walk shared by the Arabic (`rlig`) and Latin
//! (`liga`) shapers: scan a closed word range left to right, query the font
//! for a multi-glyph match at each surviving position, and fold matched
//! tokens into the first one via `mark_deleted` rather than removing them
//! (`spec.md` §4.5).

use crate::context::ContextRange;
use crate::error::ShapingError;
use crate::ot::{FeatureQuery, FeatureTag, LookupMatch, ScriptTag, Substitution};
use crate::tokenizer::Tokenizer;

/// Apply `feature` ligature lookups for `script` across `range`. Requires
/// the `glyphIndex` modifier to already be registered.
pub fn apply_ligatures(
    tokenizer: &mut Tokenizer,
    range: &ContextRange,
    query: &dyn FeatureQuery,
    script: ScriptTag,
    feature: FeatureTag,
) -> Result<(), ShapingError> {
    if !tokenizer.has_modifier("glyphIndex") {
        return Err(ShapingError::MissingModifier("glyphIndex"));
    }
    if !query.supports(script, feature) {
        return Ok(());
    }

    let indices: Vec<usize> = range.as_range().collect();
    let tokens = tokenizer.tokens_mut();
    let mut i = 0;
    while i < indices.len() {
        let idx = indices[i];
        if tokens[idx].is_deleted() {
            i += 1;
            continue;
        }

        let glyphs: Vec<u32> = indices[i..]
            .iter()
            .filter(|&&j| !tokens[j].is_deleted())
            .filter_map(|&j| tokens[j].glyph_index())
            .collect();

        let matched = query.lookup(script, feature, &glyphs);
        match matched {
            Some(LookupMatch {
                input_len,
                substitution: Substitution::Ligature(glyph),
            }) if input_len > 1 => {
                tokens[idx].set_glyph_index(glyph);
                let mut consumed = 1;
                let mut j = i + 1;
                while consumed < input_len && j < indices.len() {
                    let jdx = indices[j];
                    if !tokens[jdx].is_deleted() {
                        tokens[jdx].mark_deleted();
                        consumed += 1;
                    }
                    j += 1;
                }
                i = j;
            }
            _ => i += 1,
        }
    }

    Ok(())
}
