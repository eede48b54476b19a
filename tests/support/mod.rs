//! A font test double shared by the integration tests: glyph ids are just
//! the input `char` as `u32`, and the only lookups it understands are a
//! Latin "fi" ligature, an Arabic lam-alef ligature, and Arabic positional
//! forms (which it reports by adding a per-form offset to the base glyph).

use shape_core::{FeatureQuery, FeatureTag, GlyphIndexResolver, LookupMatch, ScriptTag, Substitution};

pub struct MockFont;

impl GlyphIndexResolver for MockFont {
    fn char_to_glyph_index(&self, c: char) -> u32 {
        c as u32
    }
}

impl FeatureQuery for MockFont {
    fn supports(&self, _script: ScriptTag, _feature: FeatureTag) -> bool {
        true
    }

    fn lookup(&self, script: ScriptTag, feature: FeatureTag, glyphs: &[u32]) -> Option<LookupMatch> {
        if glyphs.is_empty() {
            return None;
        }

        if script == ScriptTag::LATIN && feature == FeatureTag::STANDARD_LIGATURES && glyphs.len() >= 2 {
            if glyphs[0] == 'f' as u32 && glyphs[1] == 'i' as u32 {
                return Some(LookupMatch {
                    input_len: 2,
                    substitution: Substitution::Ligature(0xFB01),
                });
            }
        }

        if script == ScriptTag::ARABIC && feature == FeatureTag::REQUIRED_LIGATURES && glyphs.len() >= 2 {
            // lam (U+0644) + alef (U+0627) -> lam-alef presentation form.
            if glyphs[0] == 0x0644 && glyphs[1] == 0x0627 {
                return Some(LookupMatch {
                    input_len: 2,
                    substitution: Substitution::Ligature(0xFEFB),
                });
            }
        }

        if script == ScriptTag::ARABIC
            && matches!(
                feature,
                FeatureTag::ISOLATED_FORMS | FeatureTag::INITIAL_FORMS | FeatureTag::MEDIAL_FORMS | FeatureTag::FINAL_FORMS
            )
        {
            let offset = match feature {
                FeatureTag::ISOLATED_FORMS => 0x1000,
                FeatureTag::INITIAL_FORMS => 0x2000,
                FeatureTag::MEDIAL_FORMS => 0x3000,
                FeatureTag::FINAL_FORMS => 0x4000,
                _ => unreachable!(),
            };
            return Some(LookupMatch {
                input_len: 1,
                substitution: Substitution::Single(glyphs[0] + offset),
            });
        }

        None
    }
}
