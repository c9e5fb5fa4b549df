//! Scoring Context
//!
//! Everything a submission needs, loaded once at process start and shared
//! read-only: feature schema, model, optional imputer, builder config and
//! thresholds. Pass it by reference (or `Arc`) into request handlers.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::features::{
    FeatureBuilder, FeatureError, FeatureProfile, FeatureSchema, FeatureVector, RawInput,
};
use crate::logic::risk::{RiskBand, RiskBander, RiskThresholds};

use super::artifacts::{digest_artifact, load_feature_names, ArtifactDigest, ArtifactError, ArtifactPaths};
use super::imputer::Imputer;
use super::inference::{check_probability, InferenceError, OnnxRiskModel, RiskModel};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error("features still missing after imputation: {}", .0.join(", "))]
    Unfilled(Vec<String>),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

// ============================================================================
// OPTIONS & OUTPUT
// ============================================================================

/// Knobs chosen at startup
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringOptions {
    pub profile: FeatureProfile,
    pub strict_features: bool,
    pub thresholds: RiskThresholds,
}

/// Result of one submission. Returned, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(flatten)]
    pub band: RiskBand,
    pub profile: FeatureProfile,
    /// Model features that were not produced by the builder
    pub defaulted_features: Vec<String>,
    /// Cells filled by the imputer
    pub imputed_cells: usize,
    pub scored_at: DateTime<Utc>,
}

/// Context description for status endpoints and startup logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextInfo {
    pub model_name: String,
    pub profile: FeatureProfile,
    pub strict_features: bool,
    pub feature_count: usize,
    pub layout_hash: String,
    pub feature_names: Vec<String>,
    pub imputer_strategy: Option<String>,
    pub thresholds: RiskThresholds,
    pub artifacts: Vec<ArtifactDigest>,
    pub loaded_at: DateTime<Utc>,
}

// ============================================================================
// CONTEXT
// ============================================================================

pub struct ScoringContext {
    schema: FeatureSchema,
    model: Box<dyn RiskModel>,
    imputer: Option<Imputer>,
    builder: FeatureBuilder,
    bander: RiskBander,
    options: ScoringOptions,
    artifacts: Vec<ArtifactDigest>,
    loaded_at: DateTime<Utc>,
}

impl std::fmt::Debug for ScoringContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringContext")
            .field("model", &self.model.name())
            .field("features", &self.schema.len())
            .field("options", &self.options)
            .finish()
    }
}

impl ScoringContext {
    /// Assemble a context from already-loaded parts
    pub fn new(
        schema: FeatureSchema,
        model: Box<dyn RiskModel>,
        imputer: Option<Imputer>,
        options: ScoringOptions,
    ) -> Result<Self, ArtifactError> {
        let config = options.profile.config().with_strict_features(options.strict_features);

        match (&imputer, config.apply_imputer) {
            (Some(imputer), _) => imputer.check_schema(&schema)?,
            (None, true) => return Err(ArtifactError::MissingImputer),
            (None, false) => {}
        }
        if imputer.is_some() && !config.apply_imputer {
            log::warn!("Imputer provided but profile {} does not use it", options.profile);
        }

        Ok(Self {
            schema,
            model,
            imputer,
            builder: FeatureBuilder::new(config),
            bander: RiskBander::new(options.thresholds),
            options,
            artifacts: Vec::new(),
            loaded_at: Utc::now(),
        })
    }

    /// Load every artifact the profile needs from disk
    pub fn load(paths: &ArtifactPaths, options: ScoringOptions) -> Result<Self, ArtifactError> {
        let mut artifacts = Vec::new();

        artifacts.push(digest_artifact("feature_names", &paths.feature_names, None)?);
        let schema = load_feature_names(&paths.feature_names)?;

        artifacts.push(digest_artifact("model", &paths.model, paths.model_sha256.as_deref())?);
        let model = OnnxRiskModel::load(&paths.model, &paths.probability_output)?;

        let imputer = if options.profile.config().apply_imputer {
            artifacts.push(digest_artifact("imputer", &paths.imputer, None)?);
            Some(Imputer::load(&paths.imputer)?)
        } else {
            None
        };

        let mut context = Self::new(schema, Box::new(model), imputer, options)?;
        context.artifacts = artifacts;

        log::info!(
            "Scoring context ready: profile={}, {} features, strict={}",
            options.profile,
            context.schema.len(),
            options.strict_features
        );
        Ok(context)
    }

    /// Load with default file names from one directory
    pub fn load_dir(dir: &Path, options: ScoringOptions) -> Result<Self, ArtifactError> {
        Self::load(&ArtifactPaths::in_dir(dir), options)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    /// RawInput -> model-ready vector
    pub fn prepare(&self, input: &RawInput) -> Result<(FeatureVector, usize), ScoringError> {
        let config = self.builder.config();
        let frame = self.builder.build(input);
        let mut vector = FeatureVector::reindex(&frame, &self.schema, config.missing_policy())?;

        let mut imputed = 0;
        if config.apply_imputer {
            vector.enforce_kinds(&self.schema);
            if let Some(imputer) = &self.imputer {
                imputed = imputer.transform(&mut vector);
            }
        }

        if vector.has_missing() {
            let names = vector
                .values
                .iter()
                .zip(self.schema.names())
                .filter(|(v, _)| v.is_nan())
                .map(|(_, name)| name.clone())
                .collect();
            return Err(ScoringError::Unfilled(names));
        }

        vector.validate(&self.schema).map_err(FeatureError::from)?;
        Ok((vector, imputed))
    }

    /// Build, score and band one submission
    pub fn score(&self, input: &RawInput) -> Result<Assessment, ScoringError> {
        let (vector, imputed_cells) = self.prepare(input)?;

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("Feature vector: {}", vector.to_log_entry(&self.schema));
        }

        let probability = check_probability(self.model.predict_proba(&vector)?)?;
        let band = self.bander.classify(probability);

        log::info!(
            "Scored submission: p={:.4} category={} profile={}",
            probability,
            band.category,
            self.options.profile
        );

        Ok(Assessment {
            band,
            profile: self.options.profile,
            defaulted_features: vector
                .defaulted
                .iter()
                .map(|&i| self.schema.names()[i].clone())
                .collect(),
            imputed_cells,
            scored_at: Utc::now(),
        })
    }

    /// Band a probability without touching the model
    pub fn classify(&self, probability: f64) -> RiskBand {
        self.bander.classify(probability)
    }

    pub fn info(&self) -> ContextInfo {
        ContextInfo {
            model_name: self.model.name().to_string(),
            profile: self.options.profile,
            strict_features: self.options.strict_features,
            feature_count: self.schema.len(),
            layout_hash: format!("{:08x}", self.schema.hash()),
            feature_names: self.schema.names().to_vec(),
            imputer_strategy: self.imputer.as_ref().map(|i| i.strategy.clone()),
            thresholds: *self.bander.thresholds(),
            artifacts: self.artifacts.clone(),
            loaded_at: self.loaded_at,
        }
    }
}
