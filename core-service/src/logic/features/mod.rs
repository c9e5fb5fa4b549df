//! Features Module - Feature Construction
//!
//! Tách logic dựng feature khỏi model và banding.
//! Form values in, schema-ordered vector out.
//!
//! - `input`: RawInput and its binary encodings
//! - `layout`: builder layout, placeholders, model schema, layout hash
//! - `builder`: profiles and the derivation rules
//! - `vector`: FeatureFrame / FeatureVector and reindexing

pub mod input;
pub mod layout;
pub mod builder;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use input::{BinaryChoice, Gender, MaritalStatus, RawInput, YesNo};
pub use layout::{ColumnKind, FeatureSchema, LayoutMismatchError, SchemaError, BUILDER_LAYOUT};
pub use builder::{approval_rate, BuilderConfig, FeatureBuilder, FeatureProfile, GradeCutoff, UnknownProfile};
pub use vector::{FeatureError, FeatureFrame, FeatureVector, MissingFeaturePolicy};
