//! Latin standard ligatures (`liga`), e.g. "fi"/"fl" (`spec.md` §4.5).

use crate::context::ContextRange;
use crate::error::ShapingError;
use crate::ot::{FeatureQuery, FeatureTag, ScriptTag};
use crate::tokenizer::Tokenizer;

use super::ligature;

/// Apply `liga` ligature lookups across `range`. Requires the `glyphIndex`
/// modifier.
pub fn apply_standard_ligatures(
    tokenizer: &mut Tokenizer,
    range: &ContextRange,
    query: &dyn FeatureQuery,
) -> Result<(), ShapingError> {
    ligature::apply_ligatures(tokenizer, range, query, ScriptTag::LATIN, FeatureTag::STANDARD_LIGATURES)
}
