//! Central Configuration Constants
//!
//! Single source of truth for artifact locations and input bounds.
//! Values that the model was trained against live in `logic::features::layout`.

/// Default path of the exported classifier
pub const DEFAULT_MODEL_PATH: &str = "model.onnx";

/// Default path of the ordered feature-name list
pub const DEFAULT_FEATURE_NAMES_PATH: &str = "feature_names.json";

/// Default path of the fitted imputer (profile v2 only)
pub const DEFAULT_IMPUTER_PATH: &str = "imputer.json";

/// Default name of the probability output in the exported graph
pub const DEFAULT_PROBABILITY_OUTPUT: &str = "probabilities";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Student Dropout Predictor";

// ============================================
// Declared form bounds (inclusive)
// ============================================

pub const AGE_MIN: u32 = 16;
pub const AGE_MAX: u32 = 70;
pub const AGE_DEFAULT: u32 = 20;

pub const UNITS_MIN: u32 = 0;
pub const UNITS_MAX: u32 = 20;
pub const ENROLLED_DEFAULT: u32 = 6;
pub const APPROVED_DEFAULT: u32 = 5;
pub const WITHOUT_EVALUATION_DEFAULT: u32 = 0;

pub const GRADE_MIN: f64 = 0.0;
pub const GRADE_MAX: f64 = 20.0;
pub const GRADE_DEFAULT: f64 = 12.0;
pub const GRADE_STEP: f64 = 0.1;
