//! Arabic joining classification, positional-form assignment, and required
//! ligatures (`spec.md` §4.4).
//!
//! The original implementation this module replaces drove an FFI state
//! machine compiled from `ArabicShaping.txt`. That table and the C shim
//! around it are out of scope here; this module instead curates the
//! joining-type table for the core Arabic block and assigns forms with a
//! direct prev/next-skip-transparent rule rather than reconstructing the
//! state machine.

use crate::context::ContextRange;
use crate::error::ShapingError;
use crate::ot::{FeatureQuery, FeatureTag, LookupMatch, ScriptTag, Substitution};
use crate::tokenizer::Tokenizer;

use super::ligature;

/// Unicode's joining-type classes, restricted to the ones that participate
/// in Arabic shaping logic (`spec.md` §4.4's GLOSSARY entry for "Joining
/// type").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoiningType {
    /// Right-joining: connects to the preceding character only.
    Right,
    /// Left-joining: connects to the following character only. Rare in the
    /// core Arabic block.
    Left,
    /// Dual-joining: connects on both sides.
    Dual,
    /// Join-causing: connects on both sides without itself taking a
    /// contextual form (tatweel).
    JoinCausing,
    /// Transparent: ignored when determining a neighbor's effective type
    /// (combining marks).
    Transparent,
    /// Non-joining: connects on neither side.
    NonJoining,
}

/// The positional form assigned to a shaped Arabic token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoiningForm {
    Isolated,
    Initial,
    Medial,
    Final,
}

impl JoiningForm {
    fn feature_tag(self) -> FeatureTag {
        match self {
            JoiningForm::Isolated => FeatureTag::ISOLATED_FORMS,
            JoiningForm::Initial => FeatureTag::INITIAL_FORMS,
            JoiningForm::Medial => FeatureTag::MEDIAL_FORMS,
            JoiningForm::Final => FeatureTag::FINAL_FORMS,
        }
    }
}

/// Classify `c`'s joining type. Curated for the core Arabic block
/// (U+0600-U+06FF) plus the harakat/tatweel exceptions; characters outside
/// this block, or inside it but not covered here, classify as
/// [`JoiningType::NonJoining`] rather than panicking — a conservative
/// fallback that always renders isolated.
pub fn joining_type(c: char) -> JoiningType {
    match c {
        // Combining marks: fatha..sukun, superscript alef, small high marks.
        // Tatweel is classified transparent here too: it never breaks a
        // join between the letters around it, and (unlike a real font's
        // GSUB table) never receives a positional form of its own.
        '\u{0610}'..='\u{061A}' | '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{06D6}'..='\u{06DC}'
        | '\u{06DF}'..='\u{06E4}' | '\u{06E7}'..='\u{06E8}' | '\u{06EA}'..='\u{06ED}' | '\u{0640}' => {
            JoiningType::Transparent
        }
        // Right-joining-only letters: alef family, dal/thal, reh/zain, waw family.
        '\u{0622}' | '\u{0623}' | '\u{0625}' | '\u{0627}' | '\u{0629}' | '\u{062F}' | '\u{0630}'
        | '\u{0631}' | '\u{0632}' | '\u{0648}' | '\u{0624}' | '\u{0698}' | '\u{06C0}'
        | '\u{06D2}' | '\u{06D3}' => JoiningType::Right,
        // Hamza alone never joins.
        '\u{0621}' => JoiningType::NonJoining,
        // Arabic-Indic digits and neutral punctuation never join.
        '\u{0660}'..='\u{0669}' | '\u{06F0}'..='\u{06F9}' | '\u{060C}' | '\u{061B}' | '\u{061F}' => {
            JoiningType::NonJoining
        }
        // Everything else in the main block dual-joins: beh/teh/theh/jeem
        // family, hah/khah, seen/sheen, sad/dad, tah/zah, ain/ghain,
        // feh/qaf, kaf/lam/meem/noon, heh, yeh family.
        '\u{0626}' | '\u{0628}' | '\u{062A}'..='\u{062E}' | '\u{0633}'..='\u{063A}'
        | '\u{0641}'..='\u{0647}' | '\u{0649}' | '\u{064A}' | '\u{06A1}'..='\u{06BF}' => {
            JoiningType::Dual
        }
        _ => JoiningType::NonJoining,
    }
}

fn effective_prev_type(chars: &[char], from: usize) -> Option<JoiningType> {
    chars[..from]
        .iter()
        .rev()
        .map(|&c| joining_type(c))
        .find(|jt| *jt != JoiningType::Transparent)
}

fn effective_next_type(chars: &[char], from: usize) -> Option<JoiningType> {
    chars[from + 1..]
        .iter()
        .map(|&c| joining_type(c))
        .find(|jt| *jt != JoiningType::Transparent)
}

/// Walk `range` and write a `"form"` state on every dual- or right-joining
/// token, deciding isolated/initial/medial/final from the nearest
/// non-transparent neighbor on each side (transparent combining marks are
/// skipped when looking for a neighbor, and receive no form of their own).
/// Left-joining, join-causing, and non-joining tokens (hamza, digits,
/// neutral punctuation) never take a positional form at all, per
/// `spec.md` §4.4: "for every token in the range that is dual- or
/// right-joining, compute its form".
///
/// `canJoinLeft`/`canJoinRight` follow the asymmetric rule verbatim: a join
/// to the left only needs `prev` to be dual-, left-, or join-causing; a join
/// to the right additionally requires *this* token to be dual- or
/// right-joining, and `next` to be dual- or join-causing specifically (a
/// right-joining `next`, e.g. dual-joiner-then-alef, does not count —
/// alef never passes on a form to what precedes it).
pub fn assign_positional_forms(tokenizer: &mut Tokenizer) {
    let chars: Vec<char> = tokenizer.tokens().iter().map(|t| t.char).collect();
    for i in 0..chars.len() {
        let my_type = joining_type(chars[i]);
        if !matches!(my_type, JoiningType::Dual | JoiningType::Right) {
            continue;
        }

        let prev = effective_prev_type(&chars, i);
        let next = effective_next_type(&chars, i);

        let can_join_left =
            prev.is_some_and(|p| matches!(p, JoiningType::Dual | JoiningType::Left | JoiningType::JoinCausing));
        // `my_type` is already dual- or right-joining here (checked above).
        let can_join_right = next.is_some_and(|n| matches!(n, JoiningType::Dual | JoiningType::JoinCausing));

        let form = match (can_join_left, can_join_right) {
            (false, false) => JoiningForm::Isolated,
            (false, true) => JoiningForm::Initial,
            (true, false) => JoiningForm::Final,
            (true, true) => JoiningForm::Medial,
        };

        tokenizer.tokens_mut()[i].set_state("form", crate::token::StateValue::Form(form));
    }
}

/// Apply the GSUB positional-form lookups across `range`, substituting each
/// token's glyph with the result of `query.lookup` for the form computed by
/// [`assign_positional_forms`]. Requires the `glyphIndex` modifier.
pub fn apply_presentation_forms(
    tokenizer: &mut Tokenizer,
    range: &ContextRange,
    query: &dyn FeatureQuery,
) -> Result<(), ShapingError> {
    if !tokenizer.has_modifier("glyphIndex") {
        return Err(ShapingError::MissingModifier("glyphIndex"));
    }

    assign_positional_forms(tokenizer);

    for i in range.as_range() {
        let (form, glyph) = {
            let token = &tokenizer.tokens()[i];
            let form = match token.get_state("form") {
                Some(crate::token::StateValue::Form(f)) => *f,
                _ => continue,
            };
            let glyph = match token.glyph_index() {
                Some(g) => g,
                None => continue,
            };
            (form, glyph)
        };

        let feature = form.feature_tag();
        if !query.supports(ScriptTag::ARABIC, feature) {
            continue;
        }
        if let Some(LookupMatch {
            substitution: Substitution::Single(new_glyph),
            ..
        }) = query.lookup(ScriptTag::ARABIC, feature, &[glyph])
        {
            tokenizer.tokens_mut()[i].set_glyph_index(new_glyph);
        }
    }

    Ok(())
}

/// Apply `rlig` (required ligatures, e.g. lam-alef) across `range`.
/// Requires the `glyphIndex` modifier.
pub fn apply_required_ligatures(
    tokenizer: &mut Tokenizer,
    range: &ContextRange,
    query: &dyn FeatureQuery,
) -> Result<(), ShapingError> {
    ligature::apply_ligatures(tokenizer, range, query, ScriptTag::ARABIC, FeatureTag::REQUIRED_LIGATURES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script_context::{arabic_word_end, arabic_word_start};

    struct StubFont;

    impl FeatureQuery for StubFont {
        fn supports(&self, _script: ScriptTag, _feature: FeatureTag) -> bool {
            true
        }
        fn lookup(&self, _script: ScriptTag, feature: FeatureTag, glyphs: &[u32]) -> Option<LookupMatch> {
            if feature == FeatureTag::REQUIRED_LIGATURES && glyphs.len() >= 2 {
                // lam (0x0644) + alef (0x0627) -> lam-alef ligature.
                if glyphs[0] == 0x0644 && glyphs[1] == 0x0627 {
                    return Some(LookupMatch {
                        input_len: 2,
                        substitution: Substitution::Ligature(0xFEFB),
                    });
                }
            }
            if matches!(
                feature,
                FeatureTag::ISOLATED_FORMS | FeatureTag::INITIAL_FORMS | FeatureTag::MEDIAL_FORMS | FeatureTag::FINAL_FORMS
            ) {
                // Pretend every form lookup adds 0x1000 to the base glyph.
                return Some(LookupMatch {
                    input_len: 1,
                    substitution: Substitution::Single(glyphs[0] + 0x1000),
                });
            }
            None
        }
    }

    struct IdentityResolver;
    impl crate::ot::GlyphIndexResolver for IdentityResolver {
        fn char_to_glyph_index(&self, c: char) -> u32 {
            c as u32
        }
    }

    fn shaped_word(text: &str) -> Tokenizer {
        let mut t = Tokenizer::new();
        t.register_context_checker("arabicWord", arabic_word_start, arabic_word_end)
            .unwrap();
        t.tokenize(text);
        t.seed_glyph_index(&IdentityResolver);
        t
    }

    #[test]
    fn joining_type_covers_core_letters() {
        assert_eq!(joining_type('\u{0628}'), JoiningType::Dual); // beh
        assert_eq!(joining_type('\u{0627}'), JoiningType::Right); // alef
        assert_eq!(joining_type('\u{0640}'), JoiningType::Transparent); // tatweel
        assert_eq!(joining_type('\u{064B}'), JoiningType::Transparent); // fathatan
        assert_eq!(joining_type('\u{0621}'), JoiningType::NonJoining); // hamza
    }

    #[test]
    fn isolated_alef_gets_isolated_form() {
        let mut t = shaped_word("\u{0627}");
        assign_positional_forms(&mut t);
        assert_eq!(t.tokens()[0].get_state("form"), Some(&crate::token::StateValue::Form(JoiningForm::Isolated)));
    }

    #[test]
    fn non_joining_hamza_never_gets_a_form() {
        // beh-hamza: hamza is non-joining and must not be assigned any
        // positional form even though its left neighbor would otherwise
        // satisfy canJoinLeft.
        let mut t = shaped_word("\u{0628}\u{0621}");
        assign_positional_forms(&mut t);
        assert!(t.tokens()[1].get_state("form").is_none());
    }

    #[test]
    fn middle_of_word_dual_joiner_gets_medial_form() {
        // beh-beh-beh: middle beh joins both sides.
        let mut t = shaped_word("\u{0628}\u{0628}\u{0628}");
        assign_positional_forms(&mut t);
        assert_eq!(
            t.tokens()[1].get_state("form"),
            Some(&crate::token::StateValue::Form(JoiningForm::Medial))
        );
    }

    #[test]
    fn right_joiner_after_dual_joiner_only_connects_backward() {
        // beh-alef: alef joins back to beh (final form), but canJoinRight
        // requires `next` to be dual- or join-causing specifically, so a
        // right-joining `next` does not extend a join forward onto beh.
        let mut t = shaped_word("\u{0628}\u{0627}");
        assign_positional_forms(&mut t);
        assert_eq!(
            t.tokens()[0].get_state("form"),
            Some(&crate::token::StateValue::Form(JoiningForm::Isolated))
        );
        assert_eq!(
            t.tokens()[1].get_state("form"),
            Some(&crate::token::StateValue::Form(JoiningForm::Final))
        );
    }

    #[test]
    fn dual_joiner_before_dual_joiner_takes_initial_form() {
        // beh-beh: canJoinRight holds when `next` is dual-joining, so the
        // first beh takes initial form and the second takes final form.
        let mut t = shaped_word("\u{0628}\u{0628}");
        assign_positional_forms(&mut t);
        assert_eq!(
            t.tokens()[0].get_state("form"),
            Some(&crate::token::StateValue::Form(JoiningForm::Initial))
        );
        assert_eq!(
            t.tokens()[1].get_state("form"),
            Some(&crate::token::StateValue::Form(JoiningForm::Final))
        );
    }

    #[test]
    fn transparent_tatweel_does_not_break_the_join_across_it() {
        // beh, tatweel, seen: the tatweel is skipped when each letter looks
        // for its neighbor, so beh takes initial and seen takes final form.
        let mut t = shaped_word("\u{0628}\u{0640}\u{0633}");
        assign_positional_forms(&mut t);
        assert_eq!(
            t.tokens()[0].get_state("form"),
            Some(&crate::token::StateValue::Form(JoiningForm::Initial))
        );
        assert!(t.tokens()[1].get_state("form").is_none());
        assert_eq!(
            t.tokens()[2].get_state("form"),
            Some(&crate::token::StateValue::Form(JoiningForm::Final))
        );
    }

    #[test]
    fn required_ligature_folds_lam_alef_into_one_token() {
        let mut t = shaped_word("\u{0644}\u{0627}");
        let range = t.get_context_ranges("arabicWord").unwrap()[0].clone();
        apply_required_ligatures(&mut t, &range, &StubFont).unwrap();
        assert_eq!(t.tokens()[0].glyph_index(), Some(0xFEFB));
        assert!(t.tokens()[1].is_deleted());
    }

    #[test]
    fn apply_presentation_forms_requires_glyph_index_modifier() {
        let mut t = Tokenizer::new();
        t.register_context_checker("arabicWord", arabic_word_start, arabic_word_end)
            .unwrap();
        t.tokenize("\u{0627}");
        let range = t.get_context_ranges("arabicWord").unwrap()[0].clone();
        let err = apply_presentation_forms(&mut t, &range, &StubFont).unwrap_err();
        assert_eq!(err, ShapingError::MissingModifier("glyphIndex"));
    }
}
