//! Risk Banding Rules & Thresholds
//!
//! Inherited from the modeling process that tuned the classifier.
//! KHÔNG chứa logic band - chỉ constants và config.

use serde::{Deserialize, Serialize};

// ============================================================================
// THRESHOLDS
// ============================================================================

/// At or below this probability = Safe
pub const SAFE_THRESHOLD: f64 = 0.37;

/// At or above this probability = High-Risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.60;

// ============================================================================
// CONFIGURABLE THRESHOLDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("thresholds must lie in [0, 1] (safe_max={safe_max}, high_risk_min={high_risk_min})")]
    OutOfRange { safe_max: f64, high_risk_min: f64 },

    #[error("safe_max ({safe_max}) must be below high_risk_min ({high_risk_min})")]
    Inverted { safe_max: f64, high_risk_min: f64 },
}

/// Band boundaries, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// p <= safe_max -> Safe
    pub safe_max: f64,
    /// p >= high_risk_min -> High-Risk, between -> Warning
    pub high_risk_min: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            safe_max: SAFE_THRESHOLD,
            high_risk_min: HIGH_RISK_THRESHOLD,
        }
    }
}

impl RiskThresholds {
    pub fn new(safe_max: f64, high_risk_min: f64) -> Result<Self, ThresholdError> {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        if !in_range(safe_max) || !in_range(high_risk_min) {
            return Err(ThresholdError::OutOfRange { safe_max, high_risk_min });
        }
        if safe_max >= high_risk_min {
            return Err(ThresholdError::Inverted { safe_max, high_risk_min });
        }
        Ok(Self { safe_max, high_risk_min })
    }
}
