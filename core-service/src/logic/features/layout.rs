//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! Two layouts meet here:
//! 1. `BUILDER_LAYOUT` - every feature the builder knows how to produce, with
//!    its numeric kind. Fixed at compile time.
//! 2. `FeatureSchema` - the ordered name list the trained model declares.
//!    Loaded from disk, authoritative for column order.
//!
//! The builder fills (1), `FeatureVector::reindex` projects it onto (2).

use std::collections::HashSet;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// COLUMN KINDS
// ============================================================================

/// Numeric kind of a column, enforced before imputation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
}

impl ColumnKind {
    /// Coerce a value to this kind. Integer truncates toward zero, NaN stays NaN.
    pub fn coerce(self, value: f64) -> f64 {
        match self {
            ColumnKind::Integer => value.trunc(),
            ColumnKind::Float => value,
        }
    }
}

/// One entry of the builder layout
#[derive(Debug, Clone, Copy)]
pub struct FeatureDef {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn int(name: &'static str) -> FeatureDef {
    FeatureDef { name, kind: ColumnKind::Integer }
}

const fn float(name: &'static str) -> FeatureDef {
    FeatureDef { name, kind: ColumnKind::Float }
}

// ============================================================================
// BUILDER LAYOUT (Authoritative source for what we can produce)
// ============================================================================

pub const BUILDER_LAYOUT: &[FeatureDef] = &[
    // === Collected (0-2) ===
    int("Age_at_enrollment"),
    int("Gender"),
    int("Marital_status"),

    // === Enrollment placeholders (3-6) ===
    int("Course"),
    int("Daytime_evening_attendance"),
    int("Previous_qualification"),
    float("Admission_grade"),

    // === Financial (7-9) ===
    int("Tuition_fees_up_to_date"),
    int("Scholarship_holder"),
    int("Debtor"),

    // === 1st semester (10-13) ===
    int("Curricular_units_1st_sem_enrolled"),
    int("Curricular_units_1st_sem_approved"),
    float("Curricular_units_1st_sem_grade"),
    float("approval_rate_1st"),

    // === Derived (14-24) ===
    int("low_grade_1st"),
    int("inactive_1st"),
    float("grade_change"),
    int("sharp_decline"),
    int("total_approved"),
    int("total_enrolled"),
    float("academic_efficiency"),
    int("financial_risk"),
    int("high_financial_risk"),
    int("low_grade_financial_risk"),
    int("no_scholarship_low_grade"),

    // === Remaining curricular units (25-33) ===
    int("Curricular_units_1st_sem_credited"),
    int("Curricular_units_1st_sem_evaluations"),
    int("Curricular_units_1st_sem_without_evaluations"),
    int("Curricular_units_2nd_sem_credited"),
    int("Curricular_units_2nd_sem_enrolled"),
    int("Curricular_units_2nd_sem_evaluations"),
    int("Curricular_units_2nd_sem_approved"),
    float("Curricular_units_2nd_sem_grade"),
    int("Curricular_units_2nd_sem_without_evaluations"),

    // === Macroeconomic (34-36) ===
    float("Unemployment_rate"),
    float("Inflation_rate"),
    float("GDP"),
];

/// Total number of builder features
/// IMPORTANT: Must match BUILDER_LAYOUT.len()!
pub const BUILDER_FEATURE_COUNT: usize = 37;

// ============================================================================
// PLACEHOLDERS (not collected by the form, fixed stand-ins)
// ============================================================================

pub const PLACEHOLDER_COURSE: f64 = 9085.0;
pub const PLACEHOLDER_ATTENDANCE: f64 = 1.0;
pub const PLACEHOLDER_PREVIOUS_QUALIFICATION: f64 = 1.0;
pub const PLACEHOLDER_ADMISSION_GRADE: f64 = 120.0;
pub const PLACEHOLDER_GRADE_CHANGE: f64 = -5.0;
pub const PLACEHOLDER_UNEMPLOYMENT_RATE: f64 = 13.9;
pub const PLACEHOLDER_INFLATION_RATE: f64 = -0.3;
pub const PLACEHOLDER_GDP: f64 = 0.79;

/// Added to denominators of unit rates
pub const RATE_EPSILON: f64 = 1e-5;

/// Get builder feature index by name
pub fn builder_index(name: &str) -> Option<usize> {
    BUILDER_LAYOUT.iter().position(|def| def.name == name)
}

/// Numeric kind for any feature name. Names the builder does not know are
/// treated as floats.
pub fn column_kind(name: &str) -> ColumnKind {
    BUILDER_LAYOUT
        .iter()
        .find(|def| def.name == name)
        .map(|def| def.kind)
        .unwrap_or(ColumnKind::Float)
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of an ordered feature-name list
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash<S: AsRef<str>>(names: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// MODEL SCHEMA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("feature-name list is empty")]
    Empty,

    #[error("feature name '{0}' appears more than once")]
    Duplicate(String),
}

/// Ordered feature names declared by the trained model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    names: Vec<String>,
    hash: u32,
}

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> Result<Self, SchemaError> {
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }

        let hash = compute_layout_hash(&names);
        Ok(Self { names, hash })
    }

    /// Schema matching the full builder layout, in builder order
    pub fn builder_default() -> Self {
        let names: Vec<String> = BUILDER_LAYOUT.iter().map(|d| d.name.to_string()).collect();
        let hash = compute_layout_hash(&names);
        Self { names, hash }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Get feature index by name (O(n) but features are few)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Declared names the builder never produces
    pub fn unknown_to_builder(&self) -> Vec<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|name| builder_index(name).is_none())
            .collect()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Feature layout mismatch: expected hash {expected_hash:08x}, got {actual_hash:08x}")]
pub struct LayoutMismatchError {
    pub expected_hash: u32,
    pub actual_hash: u32,
}

/// Validate that a vector was built for this schema
pub fn validate_layout(schema: &FeatureSchema, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    if incoming_hash != schema.hash() {
        return Err(LayoutMismatchError {
            expected_hash: schema.hash(),
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
