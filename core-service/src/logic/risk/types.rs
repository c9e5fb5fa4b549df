//! Risk Types
//!
//! Core types cho risk banding.
//! KHÔNG chứa logic - chỉ data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// RISK CATEGORY
// ============================================================================

/// Dropout risk levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// Jalur aman, cukup dipantau berkala
    Safe,
    /// Mulai berisiko, perlu pengecekan
    Warning,
    /// Berisiko tinggi, perlu intervensi
    HighRisk,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Safe => "safe",
            RiskCategory::Warning => "warning",
            RiskCategory::HighRisk => "high_risk",
        }
    }

    /// Headline shown to the advisor
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Safe => "Tidak Berisiko Dropout",
            RiskCategory::Warning => "Mulai Berisiko Dropout",
            RiskCategory::HighRisk => "Berisiko Tinggi Dropout",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskCategory::Safe => "#006400",     // Dark green
            RiskCategory::Warning => "#DE9B0B",  // Amber
            RiskCategory::HighRisk => "#B22222", // Firebrick
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RiskCategory::Safe => "✅",
            RiskCategory::Warning => "⚠️",
            RiskCategory::HighRisk => "‼️",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            RiskCategory::Safe => {
                "💡 Mahasiswa ini berada dalam jalur aman. Tetap pantau perkembangannya secara berkala."
            }
            RiskCategory::Warning => {
                "💡 Mahasiswa ini mulai berisiko dropout. Rekomendasi: Lakukan pengecekan akademik dan finansial. Beri dukungan motivasi belajar atau opsi cicilan pembayaran."
            }
            RiskCategory::HighRisk => {
                "💡 Mahasiswa ini berisiko tinggi dropout. Rekomendasi: Segera lakukan intervensi intensif melalui konseling akademik, kegiatan tutor, penyesuaian beban, atau memberikan bantuan finansial."
            }
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// BANDING RESULT
// ============================================================================

/// A probability placed in its band, with everything needed to display it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBand {
    pub category: RiskCategory,
    pub probability: f64,
    /// `probability` as a percentage with two decimals, e.g. "45.00%"
    pub probability_display: String,
    pub label: String,
    pub color: String,
    pub icon: String,
    pub advice: String,
}

impl RiskBand {
    pub fn new(category: RiskCategory, probability: f64) -> Self {
        Self {
            category,
            probability,
            probability_display: format_percent(probability),
            label: category.label().to_string(),
            color: category.color().to_string(),
            icon: category.icon().to_string(),
            advice: category.advice().to_string(),
        }
    }
}

pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.45), "45.00%");
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(1.0), "100.00%");
        assert_eq!(format_percent(0.1234), "12.34%");
    }

    #[test]
    fn test_category_attributes_distinct() {
        let all = [RiskCategory::Safe, RiskCategory::Warning, RiskCategory::HighRisk];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.color(), b.color());
                assert_ne!(a.label(), b.label());
                assert_ne!(a.advice(), b.advice());
            }
        }
        assert_eq!(RiskCategory::HighRisk.to_string(), "high_risk");
    }

    #[test]
    fn test_serialize_category() {
        let json = serde_json::to_string(&RiskCategory::HighRisk).unwrap();
        assert_eq!(json, "\"high_risk\"");
    }
}
