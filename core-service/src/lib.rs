//! Student Dropout Risk - Core
//!
//! Form values -> feature vector -> classifier probability -> risk band.
//!
//! ```ignore
//! use dropout_risk_core::{RawInput, ScoringContext, ScoringOptions};
//!
//! let context = ScoringContext::load_dir("artifacts".as_ref(), ScoringOptions::default())?;
//! let assessment = context.score(&RawInput::default())?;
//! println!("{} {}", assessment.band.label, assessment.band.probability_display);
//! ```

pub mod constants;
pub mod logic;

pub use logic::features::{
    BinaryChoice, BuilderConfig, FeatureBuilder, FeatureProfile, FeatureSchema, FeatureVector,
    Gender, MaritalStatus, MissingFeaturePolicy, RawInput, YesNo,
};
pub use logic::model::{
    ArtifactError, ArtifactPaths, Assessment, ContextInfo, InferenceError, RiskModel,
    ScoringContext, ScoringError, ScoringOptions,
};
pub use logic::risk::{RiskBand, RiskCategory, RiskThresholds};
