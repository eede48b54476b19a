//! The OpenType query seam: tags and the traits a caller implements to let
//! the shapers run GSUB lookups and resolve glyph ids, without this crate
//! ever touching a font file itself.

pub mod shape_plan;

pub use shape_plan::{FeatureQuery, FeatureTag, GlyphIndexResolver, LookupMatch, ScriptFeatures, ScriptTag, Substitution};
