//! Unicode code-point classification used by the context predicates and the
//! Arabic shaper.
//!
//! Script membership is delegated to the `unicode-script` crate and general
//! category to `unicode-general-category`, the same family of sibling
//! `unicode-*` crates the teacher project leans on rather than hand-rolling
//! range tables for every classification.

use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_script::{Script, UnicodeScript};

/// Arabic-Indic digits, the Eastern Arabic-Indic extension block, and the
/// handful of punctuation marks Unicode classifies as `Common`/`Inherited`
/// but which read as part of an Arabic run (`spec.md` §4.3).
const ARABIC_NEUTRALS: &[std::ops::RangeInclusive<u32>] = &[
    0x0660..=0x0669, // Arabic-Indic digits
    0x06F0..=0x06F9, // Extended Arabic-Indic digits
    0x060C..=0x060C, // Arabic comma
    0x061B..=0x061B, // Arabic semicolon
    0x061F..=0x061F, // Arabic question mark
    0x066A..=0x066D, // Arabic percent/decimal/thousands/five pointed star
];

/// Classification helpers over `char`, mirroring the teacher's
/// `crate::unicode::CharExt` extension trait.
pub trait CharExt {
    /// True for `Script::Arabic` code points plus the script-neutral digits
    /// and punctuation `spec.md` §4.3 calls out as part of an Arabic run.
    fn is_arabic_char(self) -> bool;
    /// True for `Script::Latin` code points plus ASCII digits.
    fn is_latin_char(self) -> bool;
    /// Unicode `White_Space`.
    fn is_whitespace_char(self) -> bool;
    /// Any general category starting with `P` (punctuation).
    fn is_punctuation_char(self) -> bool;
    /// Whitespace or terminal punctuation (`.!?` and Arabic equivalents)
    /// that ends an Arabic sentence range.
    fn is_sentence_break_char(self) -> bool;
}

impl CharExt for char {
    fn is_arabic_char(self) -> bool {
        if self.script() == Script::Arabic {
            return true;
        }
        let cp = self as u32;
        ARABIC_NEUTRALS.iter().any(|r| r.contains(&cp))
    }

    fn is_latin_char(self) -> bool {
        self.script() == Script::Latin || self.is_ascii_digit()
    }

    fn is_whitespace_char(self) -> bool {
        self.is_whitespace()
    }

    fn is_punctuation_char(self) -> bool {
        matches!(
            get_general_category(self),
            GeneralCategory::ConnectorPunctuation
                | GeneralCategory::DashPunctuation
                | GeneralCategory::OpenPunctuation
                | GeneralCategory::ClosePunctuation
                | GeneralCategory::InitialPunctuation
                | GeneralCategory::FinalPunctuation
                | GeneralCategory::OtherPunctuation
        )
    }

    fn is_sentence_break_char(self) -> bool {
        matches!(self, '.' | '!' | '?' | '\u{06D4}')
    }
}
