//! Risk Module
//!
//! Chuyển xác suất dropout thành Safe/Warning/High-Risk.
//!
//! ## Structure
//! - `types`: RiskCategory and its display attributes
//! - `rules`: Thresholds
//! - `bander`: Banding logic
//!
//! ## Usage
//! ```ignore
//! use dropout_risk_core::logic::risk::{band, RiskCategory};
//!
//! match band(0.45) {
//!     RiskCategory::Safe => println!("On track"),
//!     RiskCategory::Warning => println!("Check in"),
//!     RiskCategory::HighRisk => println!("Intervene"),
//! }
//! ```

pub mod types;
pub mod rules;
pub mod bander;

pub use types::{RiskBand, RiskCategory};
pub use rules::{RiskThresholds, ThresholdError, HIGH_RISK_THRESHOLD, SAFE_THRESHOLD};
pub use bander::{band, band_with_thresholds, RiskBander};
