//! Imputer - fills missing cells with statistics learned at training time
//!
//! Artifact format:
//! ```json
//! { "strategy": "median", "feature_names": ["Age_at_enrollment", ...], "statistics": [20.0, ...] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureSchema, FeatureVector};

use super::artifacts::{read_json, ArtifactError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Imputer {
    /// Informational: mean / median / most_frequent / constant
    #[serde(default = "default_strategy")]
    pub strategy: String,
    pub feature_names: Vec<String>,
    pub statistics: Vec<f64>,
}

fn default_strategy() -> String {
    "median".to_string()
}

impl Imputer {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let imputer: Imputer = read_json(path)?;
        if imputer.feature_names.len() != imputer.statistics.len() {
            return Err(ArtifactError::ImputerMismatch(format!(
                "{} feature names but {} statistics",
                imputer.feature_names.len(),
                imputer.statistics.len()
            )));
        }
        log::info!(
            "Loaded imputer ({}, {} columns) from {}",
            imputer.strategy,
            imputer.statistics.len(),
            path.display()
        );
        Ok(imputer)
    }

    /// The imputer must have been fitted on exactly the model's columns
    pub fn check_schema(&self, schema: &FeatureSchema) -> Result<(), ArtifactError> {
        if self.feature_names.len() != self.statistics.len() {
            return Err(ArtifactError::ImputerMismatch(format!(
                "{} feature names but {} statistics",
                self.feature_names.len(),
                self.statistics.len()
            )));
        }

        if self.feature_names.as_slice() != schema.names() {
            let first_diff = self
                .feature_names
                .iter()
                .zip(schema.names())
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| self.feature_names.len().min(schema.len()));
            return Err(ArtifactError::ImputerMismatch(format!(
                "column order differs from model at position {} ({} vs {} columns)",
                first_diff,
                self.feature_names.len(),
                schema.len()
            )));
        }

        Ok(())
    }

    /// Replace NaN cells. Returns how many were filled.
    pub fn transform(&self, vector: &mut FeatureVector) -> usize {
        let mut filled = 0;
        for (value, statistic) in vector.values.iter_mut().zip(&self.statistics) {
            if value.is_nan() {
                *value = *statistic;
                filled += 1;
            }
        }
        filled
    }
}
