//! Soft and hard failure tiers.
//!
//! Soft failures (`TokenizerError`) are returned by value from the
//! tokenizer's mutating operations; callers are expected to inspect and
//! continue. Hard failures (`ShapingError`) indicate misuse severe enough
//! that the resulting output cannot be trusted.

/// A failure from one of the tokenizer's mutating or registration operations.
///
/// These are "soft" in the sense of `spec.md` §7: they are always returned,
/// never panicked, and a caller may keep using the tokenizer afterwards.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenizerError {
    /// `insertToken`/`replaceToken`/`replaceRange` was given a position
    /// outside `0..=tokens.len()` (or `0..tokens.len()` for replace).
    #[error("index {index} out of bounds for {len} tokens")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The token vector length at the time of the call.
        len: usize,
    },

    /// `removeToken`/`replaceToken` referenced a token that has been deleted
    /// or never existed.
    #[error("invalid range [{start}, {end}) for {len} tokens")]
    InvalidRange {
        /// Range start.
        start: usize,
        /// Range end (exclusive).
        end: usize,
        /// The token vector length at the time of the call.
        len: usize,
    },

    /// `registerContextChecker` was called twice with the same name.
    #[error("a context checker named {0:?} is already registered")]
    DuplicateContextChecker(String),

    /// Every operation passed to `composeRUD` failed; carries one error per
    /// input operation, aligned by index.
    #[error("all {} operations in composeRUD failed", .0.len())]
    ComposeRudFailed(Vec<TokenizerError>),
}

/// A failure severe enough that the produced output must not be used.
///
/// These are "hard" per `spec.md` §7: they indicate a caller bug (a missing
/// prerequisite modifier, or applying features with no usable font query)
/// rather than bad input text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapingError {
    /// An Arabic shaping pass ran before the `glyphIndex` modifier was
    /// registered on the tokenizer.
    #[error("shaping pass requires the {0:?} modifier to be registered first")]
    MissingModifier(&'static str),

    /// `applyFeatures` was invoked with a `FeatureQuery` that cannot service
    /// any script/feature combination. Kept for contract parity with
    /// `spec.md` §7; see `SPEC_FULL.md` §8 for why this crate's trait-based
    /// design makes it effectively unreachable.
    #[error("applyFeatures called with no usable font query")]
    NoFontQuery,
}
