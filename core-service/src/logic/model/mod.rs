//! Model Module - Classifier & Scoring
//!
//! Tách logic inference khỏi feature construction.
//! Model là external artifact, chỉ dùng qua trait `RiskModel`.

pub mod artifacts;
pub mod imputer;
pub mod inference;
pub mod context;

#[cfg(test)]
mod tests;

// Re-export common types
pub use artifacts::{ArtifactDigest, ArtifactError, ArtifactPaths};
pub use imputer::Imputer;
pub use inference::{InferenceError, OnnxRiskModel, RiskModel};
pub use context::{Assessment, ContextInfo, ScoringContext, ScoringError, ScoringOptions};
