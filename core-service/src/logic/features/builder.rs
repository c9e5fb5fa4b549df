//! Feature Builder
//!
//! RawInput -> FeatureFrame. Encodes the binary selections, derives the
//! engineered indicators and fills the placeholders the form never collects.
//!
//! Two named profiles exist because the model went through two versions:
//! - `V1`: `low_grade_1st` is `grade <= 11.0`, compound financial indicators,
//!   no inactivity tracking, no imputer.
//! - `V2`: `low_grade_1st` is `grade < 10.0`, `inactive_1st` from units
//!   without evaluation, missing columns go through the fitted imputer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::input::{BinaryChoice, RawInput};
use super::layout::{
    PLACEHOLDER_ADMISSION_GRADE, PLACEHOLDER_ATTENDANCE, PLACEHOLDER_COURSE, PLACEHOLDER_GDP,
    PLACEHOLDER_GRADE_CHANGE, PLACEHOLDER_INFLATION_RATE, PLACEHOLDER_PREVIOUS_QUALIFICATION,
    PLACEHOLDER_UNEMPLOYMENT_RATE, RATE_EPSILON,
};
use super::vector::{FeatureFrame, MissingFeaturePolicy};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Low-grade indicator cutoff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeCutoff {
    pub threshold: f64,
    /// `true` for `grade <= threshold`, `false` for `grade < threshold`
    pub inclusive: bool,
}

impl GradeCutoff {
    pub const fn at_most(threshold: f64) -> Self {
        Self { threshold, inclusive: true }
    }

    pub const fn below(threshold: f64) -> Self {
        Self { threshold, inclusive: false }
    }

    pub fn is_low(&self, grade: f64) -> bool {
        if self.inclusive {
            grade <= self.threshold
        } else {
            grade < self.threshold
        }
    }
}

/// Builder configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    pub low_grade: GradeCutoff,
    /// Emit high_financial_risk, low_grade_financial_risk, no_scholarship_low_grade
    pub compound_indicators: bool,
    /// Read units without evaluation into inactive_1st
    pub track_inactive: bool,
    /// Enforce column kinds and run the imputer before scoring
    pub apply_imputer: bool,
    /// Reject instead of defaulting features the model expects but we lack
    pub strict_features: bool,
}

impl BuilderConfig {
    pub const fn v1() -> Self {
        Self {
            low_grade: GradeCutoff::at_most(11.0),
            compound_indicators: true,
            track_inactive: false,
            apply_imputer: false,
            strict_features: false,
        }
    }

    pub const fn v2() -> Self {
        Self {
            low_grade: GradeCutoff::below(10.0),
            compound_indicators: false,
            track_inactive: true,
            apply_imputer: true,
            strict_features: false,
        }
    }

    pub fn with_strict_features(mut self, strict: bool) -> Self {
        self.strict_features = strict;
        self
    }

    /// How reindexing treats declared features the builder did not produce
    pub fn missing_policy(&self) -> MissingFeaturePolicy {
        if self.strict_features {
            MissingFeaturePolicy::Strict
        } else if self.apply_imputer {
            MissingFeaturePolicy::MarkMissing
        } else {
            MissingFeaturePolicy::FillZero
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::v1()
    }
}

/// Named builder configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureProfile {
    #[default]
    V1,
    V2,
}

impl FeatureProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureProfile::V1 => "v1",
            FeatureProfile::V2 => "v2",
        }
    }

    pub fn config(&self) -> BuilderConfig {
        match self {
            FeatureProfile::V1 => BuilderConfig::v1(),
            FeatureProfile::V2 => BuilderConfig::v2(),
        }
    }
}

impl fmt::Display for FeatureProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature profile '{0}' (expected v1 or v2)")]
pub struct UnknownProfile(pub String);

impl FromStr for FeatureProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(FeatureProfile::V1),
            "v2" | "2" => Ok(FeatureProfile::V2),
            other => Err(UnknownProfile(other.to_string())),
        }
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// `approved / (enrolled + ε)`
pub fn approval_rate(approved: u32, enrolled: u32) -> f64 {
    approved as f64 / (enrolled as f64 + RATE_EPSILON)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder {
    config: BuilderConfig,
}

impl FeatureBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn for_profile(profile: FeatureProfile) -> Self {
        Self::new(profile.config())
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn build(&self, input: &RawInput) -> FeatureFrame {
        let cfg = &self.config;
        let mut frame = FeatureFrame::new();

        let enrolled = input.enrolled_1st;
        let approved = input.approved_1st;
        let grade = input.grade_1st;

        let tuition = input.tuition_fees_up_to_date.encode();
        let scholarship = input.scholarship_holder.encode();
        let debtor = input.debtor.encode();

        let rate = approval_rate(approved, enrolled);
        let low_grade = cfg.low_grade.is_low(grade);
        let financial_risk = debtor == 1 || tuition == 0;
        let without_evaluations = if cfg.track_inactive { input.without_evaluations_1st } else { 0 };

        // Collected
        frame.put("Age_at_enrollment", input.age as f64);
        frame.put("Gender", input.gender.encode() as f64);
        frame.put("Marital_status", input.marital_status.encode() as f64);
        frame.put("Tuition_fees_up_to_date", tuition as f64);
        frame.put("Scholarship_holder", scholarship as f64);
        frame.put("Debtor", debtor as f64);
        frame.put("Curricular_units_1st_sem_enrolled", enrolled as f64);
        frame.put("Curricular_units_1st_sem_approved", approved as f64);
        frame.put("Curricular_units_1st_sem_grade", grade);
        frame.put("Curricular_units_1st_sem_evaluations", approved as f64);
        frame.put("Curricular_units_1st_sem_without_evaluations", without_evaluations as f64);

        // Derived
        frame.put("approval_rate_1st", rate);
        frame.put("academic_efficiency", rate);
        frame.put("total_approved", approved as f64);
        frame.put("total_enrolled", enrolled as f64);
        frame.put_flag("low_grade_1st", low_grade);
        frame.put_flag("inactive_1st", without_evaluations > 0);
        frame.put_flag("financial_risk", financial_risk);

        if cfg.compound_indicators {
            frame.put_flag("high_financial_risk", scholarship == 0 && debtor == 1);
            frame.put_flag("low_grade_financial_risk", low_grade && financial_risk);
            frame.put_flag("no_scholarship_low_grade", scholarship == 0 && low_grade);
        }

        // Placeholders
        frame.put("Course", PLACEHOLDER_COURSE);
        frame.put("Daytime_evening_attendance", PLACEHOLDER_ATTENDANCE);
        frame.put("Previous_qualification", PLACEHOLDER_PREVIOUS_QUALIFICATION);
        frame.put("Admission_grade", PLACEHOLDER_ADMISSION_GRADE);
        frame.put("grade_change", PLACEHOLDER_GRADE_CHANGE);
        frame.put("sharp_decline", 0.0);
        frame.put("Curricular_units_1st_sem_credited", 0.0);
        frame.put("Curricular_units_2nd_sem_credited", 0.0);
        frame.put("Curricular_units_2nd_sem_enrolled", 0.0);
        frame.put("Curricular_units_2nd_sem_evaluations", 0.0);
        frame.put("Curricular_units_2nd_sem_approved", 0.0);
        frame.put("Curricular_units_2nd_sem_grade", 0.0);
        frame.put("Curricular_units_2nd_sem_without_evaluations", 0.0);
        frame.put("Unemployment_rate", PLACEHOLDER_UNEMPLOYMENT_RATE);
        frame.put("Inflation_rate", PLACEHOLDER_INFLATION_RATE);
        frame.put("GDP", PLACEHOLDER_GDP);

        frame
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_cutoff_operators() {
        let v1 = BuilderConfig::v1().low_grade;
        assert!(v1.is_low(11.0));
        assert!(!v1.is_low(11.1));

        let v2 = BuilderConfig::v2().low_grade;
        assert!(!v2.is_low(10.0));
        assert!(v2.is_low(9.9));
    }

    #[test]
    fn test_approval_rate_zero_enrolled() {
        let rate = approval_rate(0, 0);
        assert!(rate.is_finite());
        assert_eq!(rate, 0.0);

        let rate = approval_rate(3, 0);
        assert!(rate.is_finite());
        assert_eq!(rate, 3.0 / 1e-5);
    }

    #[test]
    fn test_missing_policy() {
        assert_eq!(BuilderConfig::v1().missing_policy(), MissingFeaturePolicy::FillZero);
        assert_eq!(BuilderConfig::v2().missing_policy(), MissingFeaturePolicy::MarkMissing);
        assert_eq!(
            BuilderConfig::v2().with_strict_features(true).missing_policy(),
            MissingFeaturePolicy::Strict
        );
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("v1".parse::<FeatureProfile>(), Ok(FeatureProfile::V1));
        assert_eq!(" V2 ".parse::<FeatureProfile>(), Ok(FeatureProfile::V2));
        assert!("v3".parse::<FeatureProfile>().is_err());
        assert_eq!(FeatureProfile::V2.to_string(), "v2");
    }
}
