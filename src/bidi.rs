//! The [`Bidi`] driver: binds a [`Tokenizer`] to the three script context
//! checkers and a [`FeatureQuery`]/[`GlyphIndexResolver`] pair, and applies
//! shaping features in the fixed order `spec.md` §4.6 specifies.

use crate::complex;
use crate::context::ContextRange;
use crate::error::ShapingError;
use crate::ot::{FeatureQuery, FeatureTag, GlyphIndexResolver, ScriptFeatures, ScriptTag};
use crate::script_context;
use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// Binds a tokenizer to the Latin/Arabic context checkers and caches the
/// last `process_text` call by input equality, so repeated shaping of the
/// same run of text does not re-scan it.
pub struct Bidi {
    tokenizer: Tokenizer,
    cached_text: Option<String>,
}

impl Default for Bidi {
    fn default() -> Self {
        Bidi::new()
    }
}

impl Bidi {
    /// A driver with the `latinWord`, `arabicWord`, and `arabicSentence`
    /// checkers already registered.
    pub fn new() -> Self {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .register_context_checker("latinWord", script_context::latin_word_start, script_context::latin_word_end)
            .expect("fresh tokenizer, name used once");
        tokenizer
            .register_context_checker("arabicWord", script_context::arabic_word_start, script_context::arabic_word_end)
            .expect("fresh tokenizer, name used once");
        tokenizer
            .register_context_checker(
                "arabicSentence",
                script_context::arabic_sentence_start,
                script_context::arabic_sentence_end,
            )
            .expect("fresh tokenizer, name used once");
        Bidi {
            tokenizer,
            cached_text: None,
        }
    }

    /// Re-tokenize `text`, unless the previous call already tokenized this
    /// exact string. Returns the current tokens either way.
    pub fn process_text(&mut self, text: &str) -> &[Token] {
        if self.cached_text.as_deref() != Some(text) {
            self.tokenizer.tokenize(text);
            self.cached_text = Some(text.to_string());
        }
        self.tokenizer.tokens()
    }

    /// Apply the requested OpenType features, in the fixed order: Arabic
    /// positional forms, then `rlig`, then `liga`, then Arabic sentence
    /// reversal. Each pass is gated both by whether its tag is requested
    /// *for that pass's script* and by whether `query` reports support for
    /// it.
    pub fn apply_features(
        &mut self,
        query: &dyn FeatureQuery,
        resolver: &dyn GlyphIndexResolver,
        requests: &[ScriptFeatures],
    ) -> Result<(), ShapingError> {
        self.tokenizer.seed_glyph_index(resolver);

        let wants = |script: ScriptTag, tag: FeatureTag| {
            requests.iter().any(|sf| sf.script == script && sf.tags.contains(&tag))
        };

        let wants_positional_forms = [
            FeatureTag::ISOLATED_FORMS,
            FeatureTag::INITIAL_FORMS,
            FeatureTag::MEDIAL_FORMS,
            FeatureTag::FINAL_FORMS,
        ]
        .iter()
        .any(|&tag| wants(ScriptTag::ARABIC, tag));

        let arabic_ranges = self.ranges("arabicWord");
        if wants_positional_forms {
            for range in &arabic_ranges {
                complex::arabic::apply_presentation_forms(&mut self.tokenizer, range, query)?;
            }
        }

        if wants(ScriptTag::ARABIC, FeatureTag::REQUIRED_LIGATURES) {
            for range in &arabic_ranges {
                complex::arabic::apply_required_ligatures(&mut self.tokenizer, range, query)?;
            }
        }

        if wants(ScriptTag::LATIN, FeatureTag::STANDARD_LIGATURES) {
            for range in &self.ranges("latinWord") {
                complex::latin::apply_standard_ligatures(&mut self.tokenizer, range, query)?;
            }
        }

        let sentence_ranges = self.ranges("arabicSentence");
        if !sentence_ranges.is_empty() {
            for range in &sentence_ranges {
                let mut reversed: Vec<Token> = self.tokenizer.get_range_tokens(range).to_vec();
                reversed.reverse();
                self.tokenizer
                    .replace_range(range.start_index, Some(range.end_offset), reversed, true)
                    .expect("range came from this tokenizer's own checker");
            }
            self.tokenizer.update_contexts_ranges();
        }

        Ok(())
    }

    fn ranges(&self, name: &str) -> Vec<ContextRange> {
        self.tokenizer.get_context_ranges(name).unwrap_or(&[]).to_vec()
    }

    /// The current text, in logical order after any shaping passes that
    /// reorder tokens (e.g. Arabic sentence reversal).
    pub fn get_bidi_text(&self) -> String {
        self.tokenizer.get_text()
    }

    /// The glyph ids surviving tokens currently carry, in order, reading
    /// each token's `active_state` value (`spec.md` §4.6): its first
    /// element if it is a list of glyphs, else the value itself. Falls back
    /// to the token's `glyphIndex` slot when the most recently written
    /// state isn't glyph-bearing (e.g. a positional-form pass ran but the
    /// font declared no lookup for that form, leaving `glyphIndex`
    /// unchanged). Deleted (ligature-consumed) tokens are omitted.
    pub fn get_text_glyphs(&self) -> Vec<u32> {
        self.tokenizer
            .tokens()
            .iter()
            .filter(|t| !t.is_deleted())
            .filter_map(|t| {
                t.active_state
                    .as_ref()
                    .and_then(|(_, value)| value.first_glyph())
                    .or_else(|| t.glyph_index())
            })
            .collect()
    }

    /// The underlying tokenizer, for callers that need direct access to
    /// the event/context API (e.g. to register additional modifiers).
    pub fn tokenizer(&mut self) -> &mut Tokenizer {
        &mut self.tokenizer
    }
}
