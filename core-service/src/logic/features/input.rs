//! Raw Input - Values collected from the form
//!
//! One `RawInput` per submission. Bounds are enforced where the values are
//! collected (see `constants`), nothing downstream re-validates them.

use serde::{Deserialize, Serialize};

use crate::constants::{
    AGE_DEFAULT, APPROVED_DEFAULT, ENROLLED_DEFAULT, GRADE_DEFAULT, WITHOUT_EVALUATION_DEFAULT,
};

// ============================================================================
// BINARY CHOICES
// ============================================================================

/// A two-valued selection that encodes to 0/1
pub trait BinaryChoice: Copy + Sized + 'static {
    /// Every selectable option, in display order
    const OPTIONS: &'static [Self];

    /// Encoded value fed to the model
    fn encode(self) -> u8;

    /// Label shown in the form (and accepted on submission)
    fn label(self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::OPTIONS.iter().copied().find(|o| o.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Laki-laki")]
    Male,
    #[serde(rename = "Perempuan")]
    Female,
}

impl BinaryChoice for Gender {
    const OPTIONS: &'static [Self] = &[Gender::Male, Gender::Female];

    fn encode(self) -> u8 {
        match self {
            Gender::Male => 1,
            Gender::Female => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Gender::Male => "Laki-laki",
            Gender::Female => "Perempuan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaritalStatus {
    #[serde(rename = "Belum Menikah")]
    Single,
    #[serde(rename = "Menikah")]
    Married,
}

impl BinaryChoice for MaritalStatus {
    const OPTIONS: &'static [Self] = &[MaritalStatus::Single, MaritalStatus::Married];

    fn encode(self) -> u8 {
        match self {
            MaritalStatus::Married => 1,
            MaritalStatus::Single => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MaritalStatus::Single => "Belum Menikah",
            MaritalStatus::Married => "Menikah",
        }
    }
}

/// Ya / Tidak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    #[serde(rename = "Ya")]
    Yes,
    #[serde(rename = "Tidak")]
    No,
}

impl BinaryChoice for YesNo {
    const OPTIONS: &'static [Self] = &[YesNo::Yes, YesNo::No];

    fn encode(self) -> u8 {
        match self {
            YesNo::Yes => 1,
            YesNo::No => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            YesNo::Yes => "Ya",
            YesNo::No => "Tidak",
        }
    }
}

// ============================================================================
// RAW INPUT
// ============================================================================

/// Student attributes for a single submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub age: u32,
    pub gender: Gender,
    pub marital_status: MaritalStatus,
    pub tuition_fees_up_to_date: YesNo,
    pub scholarship_holder: YesNo,
    pub debtor: YesNo,
    /// Curricular units enrolled, 1st semester
    pub enrolled_1st: u32,
    /// Curricular units approved, 1st semester
    pub approved_1st: u32,
    /// Average grade, 1st semester (0-20 scale)
    pub grade_1st: f64,
    /// Units without evaluation, 1st semester (only read by profile v2)
    #[serde(default)]
    pub without_evaluations_1st: u32,
}

impl Default for RawInput {
    /// Form defaults: a selectbox starts on its first option
    fn default() -> Self {
        Self {
            age: AGE_DEFAULT,
            gender: Gender::Male,
            marital_status: MaritalStatus::Single,
            tuition_fees_up_to_date: YesNo::Yes,
            scholarship_holder: YesNo::Yes,
            debtor: YesNo::Yes,
            enrolled_1st: ENROLLED_DEFAULT,
            approved_1st: APPROVED_DEFAULT,
            grade_1st: GRADE_DEFAULT,
            without_evaluations_1st: WITHOUT_EVALUATION_DEFAULT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_total<T: BinaryChoice + std::fmt::Debug>() {
        let mut encoded: Vec<u8> = T::OPTIONS.iter().map(|o| o.encode()).collect();
        assert!(encoded.iter().all(|&v| v <= 1));
        encoded.sort_unstable();
        encoded.dedup();
        assert_eq!(encoded.len(), T::OPTIONS.len(), "each option needs its own code");

        for option in T::OPTIONS {
            assert_eq!(T::from_label(option.label()).map(|o| o.encode()), Some(option.encode()));
        }
    }

    #[test]
    fn test_encodings_are_total() {
        assert_total::<Gender>();
        assert_total::<MaritalStatus>();
        assert_total::<YesNo>();
    }

    #[test]
    fn test_encoding_values() {
        assert_eq!(Gender::Male.encode(), 1);
        assert_eq!(Gender::Female.encode(), 0);
        assert_eq!(MaritalStatus::Married.encode(), 1);
        assert_eq!(MaritalStatus::Single.encode(), 0);
        assert_eq!(YesNo::Yes.encode(), 1);
        assert_eq!(YesNo::No.encode(), 0);
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(YesNo::from_label("Maybe"), None);
        assert_eq!(Gender::from_label("laki-laki"), None);
    }

    #[test]
    fn test_deserialize_form_labels() {
        let json = r#"{
            "age": 21, "gender": "Perempuan", "marital_status": "Menikah",
            "tuition_fees_up_to_date": "Tidak", "scholarship_holder": "Ya", "debtor": "Tidak",
            "enrolled_1st": 6, "approved_1st": 4, "grade_1st": 11.5
        }"#;
        let input: RawInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.gender, Gender::Female);
        assert_eq!(input.marital_status, MaritalStatus::Married);
        assert_eq!(input.tuition_fees_up_to_date, YesNo::No);
        assert_eq!(input.without_evaluations_1st, 0);
    }
}
