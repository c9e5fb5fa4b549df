//! Configuration module

use std::env;
use std::path::PathBuf;

use dropout_risk_core::constants::{
    DEFAULT_FEATURE_NAMES_PATH, DEFAULT_IMPUTER_PATH, DEFAULT_MODEL_PATH, DEFAULT_PROBABILITY_OUTPUT,
};
use dropout_risk_core::logic::features::UnknownProfile;
use dropout_risk_core::logic::risk::{ThresholdError, HIGH_RISK_THRESHOLD, SAFE_THRESHOLD};
use dropout_risk_core::{ArtifactPaths, FeatureProfile, RiskThresholds, ScoringOptions};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("FEATURE_PROFILE: {0}")]
    Profile(#[from] UnknownProfile),

    #[error("{name}: '{value}' is not a valid number")]
    NotANumber { name: &'static str, value: String },

    #[error("{name}: '{value}' is not a boolean (true/false, 1/0, yes/no)")]
    NotABool { name: &'static str, value: String },

    #[error("risk thresholds: {0}")]
    Thresholds(#[from] ThresholdError),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Model, feature-name list and imputer locations
    pub artifacts: ArtifactPaths,

    /// Feature builder profile (v1, v2)
    pub profile: FeatureProfile,

    /// Reject model features the builder does not produce
    pub strict_features: bool,

    /// Banding thresholds
    pub thresholds: RiskThresholds,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = match get("FEATURE_PROFILE") {
            Some(value) => value.parse::<FeatureProfile>()?,
            None => FeatureProfile::default(),
        };

        let safe_max = parse_number(&get, "SAFE_MAX", SAFE_THRESHOLD)?;
        let high_risk_min = parse_number(&get, "HIGH_RISK_MIN", HIGH_RISK_THRESHOLD)?;

        Ok(Self {
            port: parse_number(&get, "PORT", 8080)?,

            artifacts: ArtifactPaths {
                model: PathBuf::from(get("MODEL_PATH").unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string())),
                feature_names: PathBuf::from(
                    get("FEATURE_NAMES_PATH").unwrap_or_else(|| DEFAULT_FEATURE_NAMES_PATH.to_string()),
                ),
                imputer: PathBuf::from(get("IMPUTER_PATH").unwrap_or_else(|| DEFAULT_IMPUTER_PATH.to_string())),
                model_sha256: get("MODEL_SHA256").filter(|s| !s.trim().is_empty()),
                probability_output: get("MODEL_OUTPUT")
                    .unwrap_or_else(|| DEFAULT_PROBABILITY_OUTPUT.to_string()),
            },

            profile,

            strict_features: parse_bool(&get, "STRICT_FEATURES", false)?,

            thresholds: RiskThresholds::new(safe_max, high_risk_min)?,

            environment: get("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
        })
    }

    pub fn scoring_options(&self) -> ScoringOptions {
        ScoringOptions {
            profile: self.profile,
            strict_features: self.strict_features,
            thresholds: self.thresholds,
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_number<T, F>(get: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber { name, value }),
        None => Ok(default),
    }
}

fn parse_bool<F>(get: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = get(name) else {
        return Ok(default);
    };
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::NotABool { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.profile, FeatureProfile::V1);
        assert!(!config.strict_features);
        assert_eq!(config.thresholds, RiskThresholds::default());
        assert_eq!(config.artifacts, ArtifactPaths::default());
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("FEATURE_PROFILE", "v2"),
            ("STRICT_FEATURES", "true"),
            ("SAFE_MAX", "0.3"),
            ("HIGH_RISK_MIN", "0.7"),
            ("MODEL_PATH", "/srv/model.onnx"),
            ("MODEL_SHA256", "abc"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.profile, FeatureProfile::V2);
        assert!(config.strict_features);
        assert_eq!(config.thresholds.safe_max, 0.3);
        assert_eq!(config.artifacts.model, PathBuf::from("/srv/model.onnx"));
        assert_eq!(config.artifacts.model_sha256.as_deref(), Some("abc"));
        assert_eq!(config.scoring_options().profile, FeatureProfile::V2);
    }

    #[test]
    fn test_boolean_spellings() {
        for value in ["true", "TRUE", "1", "yes", "on"] {
            assert!(config(&[("STRICT_FEATURES", value)]).unwrap().strict_features, "{}", value);
        }
        for value in ["false", "0", "no", "off", ""] {
            assert!(!config(&[("STRICT_FEATURES", value)]).unwrap().strict_features, "{}", value);
        }
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(config(&[("FEATURE_PROFILE", "v9")]), Err(ConfigError::Profile(_))));
        assert!(matches!(config(&[("SAFE_MAX", "abc")]), Err(ConfigError::NotANumber { .. })));
        assert!(matches!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::NotANumber { name: "PORT", .. })
        ));
        assert!(matches!(
            config(&[("PORT", "70000")]),
            Err(ConfigError::NotANumber { name: "PORT", .. })
        ));
        assert!(matches!(
            config(&[("STRICT_FEATURES", "maybe")]),
            Err(ConfigError::NotABool { name: "STRICT_FEATURES", .. })
        ));
        assert!(matches!(
            config(&[("SAFE_MAX", "0.8"), ("HIGH_RISK_MIN", "0.6")]),
            Err(ConfigError::Thresholds(_))
        ));
    }
}
