//! Script-specific shaping passes, layered on top of the tokenizer and
//! driven by [`crate::bidi::Bidi`].

pub mod arabic;
pub mod latin;
mod ligature;
