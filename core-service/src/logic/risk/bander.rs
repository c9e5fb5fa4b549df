//! Risk Bander
//!
//! CHỈ chứa logic band - không có types, không có thresholds.
//! Input: probability. Output: RiskBand.

use super::rules::RiskThresholds;
use super::types::{RiskBand, RiskCategory};

/// Band with the default thresholds
pub fn band(probability: f64) -> RiskCategory {
    band_with_thresholds(probability, &RiskThresholds::default())
}

/// Band with custom thresholds. Both boundaries are inclusive, Safe wins a tie.
pub fn band_with_thresholds(probability: f64, thresholds: &RiskThresholds) -> RiskCategory {
    if probability <= thresholds.safe_max {
        RiskCategory::Safe
    } else if probability >= thresholds.high_risk_min {
        RiskCategory::HighRisk
    } else {
        RiskCategory::Warning
    }
}

/// Bander holding its thresholds
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskBander {
    thresholds: RiskThresholds,
}

impl RiskBander {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    pub fn classify(&self, probability: f64) -> RiskBand {
        let category = band_with_thresholds(probability, &self.thresholds);
        log::debug!("p={:.4} -> {}", probability, category);
        RiskBand::new(category, probability)
    }
}
