//! Prediction form
//!
//! Same payload for the HTML form (urlencoded) and the JSON API. This is the
//! collection boundary: bounds are checked here and nowhere after.

use dropout_risk_core::{Gender, MaritalStatus, RawInput, YesNo};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PredictForm {
    #[validate(range(min = 16, max = 70, message = "Usia harus antara 16 dan 70"))]
    pub age: u32,

    pub gender: Gender,
    pub marital_status: MaritalStatus,
    pub tuition_fees_up_to_date: YesNo,
    pub scholarship_holder: YesNo,
    pub debtor: YesNo,

    #[validate(range(max = 20, message = "Jumlah mata kuliah diambil maksimal 20"))]
    pub enrolled_1st: u32,

    #[validate(range(max = 20, message = "Jumlah mata kuliah lulus maksimal 20"))]
    pub approved_1st: u32,

    #[validate(range(min = 0.0, max = 20.0, message = "Rata-rata nilai harus antara 0.0 dan 20.0"))]
    pub grade_1st: f64,

    #[serde(default)]
    #[validate(range(max = 20, message = "Jumlah mata kuliah tanpa evaluasi maksimal 20"))]
    pub without_evaluations_1st: u32,
}

impl PredictForm {
    /// Derived bounds plus the check a range cannot express: NaN compares
    /// false both ways, so it has to be rejected explicitly.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()?;

        if !self.grade_1st.is_finite() {
            let mut error = ValidationError::new("range");
            error.message = Some("Rata-rata nilai harus antara 0.0 dan 20.0".into());
            let mut errors = ValidationErrors::new();
            errors.add("grade_1st", error);
            return Err(errors);
        }

        Ok(())
    }

    /// Validate and hand over to the core
    pub fn into_input(self) -> Result<RawInput, ValidationErrors> {
        self.check()?;
        Ok(RawInput::from(self))
    }
}

impl From<PredictForm> for RawInput {
    fn from(form: PredictForm) -> Self {
        RawInput {
            age: form.age,
            gender: form.gender,
            marital_status: form.marital_status,
            tuition_fees_up_to_date: form.tuition_fees_up_to_date,
            scholarship_holder: form.scholarship_holder,
            debtor: form.debtor,
            enrolled_1st: form.enrolled_1st,
            approved_1st: form.approved_1st,
            grade_1st: form.grade_1st,
            without_evaluations_1st: form.without_evaluations_1st,
        }
    }
}

impl From<&RawInput> for PredictForm {
    fn from(input: &RawInput) -> Self {
        PredictForm {
            age: input.age,
            gender: input.gender,
            marital_status: input.marital_status,
            tuition_fees_up_to_date: input.tuition_fees_up_to_date,
            scholarship_holder: input.scholarship_holder,
            debtor: input.debtor,
            enrolled_1st: input.enrolled_1st,
            approved_1st: input.approved_1st,
            grade_1st: input.grade_1st,
            without_evaluations_1st: input.without_evaluations_1st,
        }
    }
}
