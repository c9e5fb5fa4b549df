//! Logic Module - Business Logic
//!
//! - `features/` - Feature construction (input, layout, builder, vector)
//! - `model/` - Classifier adapter, artifacts, scoring context
//! - `risk/` - Probability banding

pub mod features;
pub mod model;
pub mod risk;
