//! The three script-driven context predicates from `spec.md` §4.3:
//! `latinWord`, `arabicWord`, `arabicSentence`.

use crate::token::ContextParams;
use crate::unicode::CharExt;

/// `latinWord` start: current is Latin and the previous character (if any)
/// is not.
pub fn latin_word_start(p: &ContextParams) -> bool {
    match p.current() {
        Some(c) if c.is_latin_char() => !p.get(-1).map_or(false, |c| c.is_latin_char()),
        _ => false,
    }
}

/// `latinWord` end: current is Latin and the next character (if any) is
/// not.
pub fn latin_word_end(p: &ContextParams) -> bool {
    match p.current() {
        Some(c) if c.is_latin_char() => !p.get(1).map_or(false, |c| c.is_latin_char()),
        _ => false,
    }
}

/// `arabicWord` start: current is Arabic and the previous character (if
/// any) is not.
pub fn arabic_word_start(p: &ContextParams) -> bool {
    match p.current() {
        Some(c) if c.is_arabic_char() => !p.get(-1).map_or(false, |c| c.is_arabic_char()),
        _ => false,
    }
}

/// `arabicWord` end: current is Arabic and the next character (if any) is
/// not.
pub fn arabic_word_end(p: &ContextParams) -> bool {
    match p.current() {
        Some(c) if c.is_arabic_char() => !p.get(1).map_or(false, |c| c.is_arabic_char()),
        _ => false,
    }
}

/// `arabicSentence` start: current is Arabic. The "no open range already"
/// half of `spec.md` §4.3's rule is enforced by the `ContextChecker` itself
/// (it never calls `check_start` while a range is open), so this predicate
/// only needs to test the character.
pub fn arabic_sentence_start(p: &ContextParams) -> bool {
    p.current().map_or(false, |c| c.is_arabic_char())
}

/// `arabicSentence` end: a sentence-break character always closes the
/// range there. Otherwise the range only closes right after an Arabic
/// character that is the *last* one before either a break character or
/// the end of text — so an interior Latin word or run of neutrals between
/// two Arabic spans keeps the range open (it is "interior" to the
/// sentence), while a *trailing* Latin word with no further Arabic behind
/// it is left out of the range entirely (`SPEC_FULL.md` §8, resolving the
/// Open Question in `spec.md` §9). Since a sentence only ever opens on an
/// Arabic character (see `arabic_sentence_start`), every open range
/// already satisfies "contains at least one Arabic character" by
/// construction.
pub fn arabic_sentence_end(p: &ContextParams) -> bool {
    match p.current() {
        Some(c) if c.is_sentence_break_char() => true,
        Some(c) if c.is_arabic_char() => {
            for &next in p.lookahead() {
                if next.is_sentence_break_char() || next.is_arabic_char() {
                    return false;
                }
            }
            true
        }
        _ => false,
    }
}
