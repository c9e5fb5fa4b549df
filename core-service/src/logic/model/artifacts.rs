//! Artifacts - files produced by the training process
//!
//! Loaded once at startup, immutable afterwards:
//! - feature names: JSON array of strings, in model order
//! - model: ONNX graph
//! - imputer (profile v2): JSON, see `imputer`

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{
    DEFAULT_FEATURE_NAMES_PATH, DEFAULT_IMPUTER_PATH, DEFAULT_MODEL_PATH, DEFAULT_PROBABILITY_OUTPUT,
};
use crate::logic::features::{FeatureSchema, SchemaError};

use super::inference::InferenceError;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid feature-name list in {path}: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("imputer does not match the model: {0}")]
    ImputerMismatch(String),

    #[error("profile requires an imputer but none was provided")]
    MissingImputer,

    #[error(transparent)]
    Model(#[from] InferenceError),
}

// ============================================================================
// PATHS
// ============================================================================

/// Where the artifacts live and how to verify them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub feature_names: PathBuf,
    pub imputer: PathBuf,
    /// Expected SHA-256 of the model file, hex
    pub model_sha256: Option<String>,
    /// Name of the probability output in the graph
    pub probability_output: String,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            feature_names: PathBuf::from(DEFAULT_FEATURE_NAMES_PATH),
            imputer: PathBuf::from(DEFAULT_IMPUTER_PATH),
            model_sha256: None,
            probability_output: DEFAULT_PROBABILITY_OUTPUT.to_string(),
        }
    }
}

impl ArtifactPaths {
    /// All artifacts under one directory with default file names
    pub fn in_dir(dir: &Path) -> Self {
        let defaults = Self::default();
        Self {
            model: dir.join(defaults.model),
            feature_names: dir.join(defaults.feature_names),
            imputer: dir.join(defaults.imputer),
            ..defaults
        }
    }
}

/// SHA-256 of a loaded artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDigest {
    pub kind: String,
    pub path: String,
    pub sha256: String,
}

// ============================================================================
// LOADERS
// ============================================================================

/// Compute SHA256 hash of file
pub fn compute_file_hash(path: &Path) -> Result<String, ArtifactError> {
    let mut file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(hex::encode(hasher.finalize()))
}

/// Hash an artifact, optionally checking it against an expected digest
pub fn digest_artifact(
    kind: &str,
    path: &Path,
    expected: Option<&str>,
) -> Result<ArtifactDigest, ArtifactError> {
    let actual = compute_file_hash(path)?;

    if let Some(expected) = expected {
        let expected = expected.trim().to_ascii_lowercase();
        if expected != actual {
            return Err(ArtifactError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected,
                actual,
            });
        }
    }

    log::info!("{} {} sha256={}", kind, path.display(), actual);

    Ok(ArtifactDigest {
        kind: kind.to_string(),
        path: path.display().to_string(),
        sha256: actual,
    })
}

/// Read any JSON artifact
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the model's ordered feature-name list
pub fn load_feature_names(path: &Path) -> Result<FeatureSchema, ArtifactError> {
    let names: Vec<String> = read_json(path)?;
    let schema = FeatureSchema::new(names).map_err(|source| ArtifactError::Schema {
        path: path.to_path_buf(),
        source,
    })?;

    let unknown = schema.unknown_to_builder();
    if !unknown.is_empty() {
        log::warn!(
            "{} model features are not produced by the builder: {:?}",
            unknown.len(),
            unknown
        );
    }

    log::info!(
        "Loaded {} feature names (layout hash: {:08x})",
        schema.len(),
        schema.hash()
    );
    Ok(schema)
}
