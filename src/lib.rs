//! A contextual tokenizer and bidirectional shaping driver for Arabic and
//! Latin OpenType text.
//!
//! The tokenizer ([`Tokenizer`]) and its event bus are generic over any
//! script: they know nothing about Arabic or Latin specifically, only
//! about characters, named context ranges, and a fixed set of events.
//! Script-specific behavior is layered on top in [`complex`] and driven
//! end to end by [`Bidi`]. Font decoding is explicitly out of scope: the
//! [`ot::FeatureQuery`] and [`ot::GlyphIndexResolver`] traits are the seam
//! a caller implements against its own font data.

mod bidi;
mod complex;
mod context;
mod error;
mod event;
mod ot;
mod script_context;
mod token;
mod tokenizer;
mod unicode;

pub use bidi::Bidi;
pub use context::{ContextChecker, ContextRange};
pub use error::{ShapingError, TokenizerError};
pub use event::{Event, EventKind, SubscriptionId};
pub use ot::{
    FeatureQuery, FeatureTag, GlyphIndexResolver, LookupMatch, ScriptFeatures, ScriptTag,
    Substitution,
};
pub use token::{ContextParams, StateValue, Token};
pub use tokenizer::{ModifierCond, ModifierFn, RudOp, RudSuccess, Tokenizer};

pub use complex::arabic::{JoiningForm, JoiningType};
pub use script_context::{
    arabic_sentence_end, arabic_sentence_start, arabic_word_end, arabic_word_start, latin_word_end,
    latin_word_start,
};
