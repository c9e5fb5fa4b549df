//! HTML rendering for the form page
//!
//! Plain server-side strings, no template engine. Everything that did not
//! come from a compile-time constant goes through `escape`.

use dropout_risk_core::constants::{
    AGE_MAX, AGE_MIN, APP_NAME, GRADE_MAX, GRADE_MIN, GRADE_STEP, UNITS_MAX, UNITS_MIN,
};
use dropout_risk_core::{Assessment, BinaryChoice, FeatureProfile};

use crate::models::PredictForm;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn select<T: BinaryChoice + PartialEq>(name: &str, label: &str, selected: T) -> String {
    let options: String = T::OPTIONS
        .iter()
        .map(|option| {
            format!(
                r#"<option value="{value}"{sel}>{value}</option>"#,
                value = option.label(),
                sel = if *option == selected { " selected" } else { "" },
            )
        })
        .collect();

    format!(
        r#"<label>{label}<select name="{name}">{options}</select></label>"#,
    )
}

fn number(name: &str, label: &str, value: impl std::fmt::Display, min: impl std::fmt::Display, max: impl std::fmt::Display, step: &str) -> String {
    format!(
        r#"<label>{label}<input type="number" name="{name}" value="{value}" min="{min}" max="{max}" step="{step}" required></label>"#,
    )
}

fn form_section(form: &PredictForm, profile: FeatureProfile) -> String {
    let grade_step = GRADE_STEP.to_string();
    let without_evaluations = if profile.config().track_inactive {
        number(
            "without_evaluations_1st",
            "Jumlah Mata Kuliah Tanpa Evaluasi (Semester 1)",
            form.without_evaluations_1st,
            UNITS_MIN,
            UNITS_MAX,
            "1",
        )
    } else {
        String::new()
    };

    format!(
        r#"<form method="post" action="/predict">
<h3>📝 Masukkan Data Mahasiswa</h3>
<fieldset>
{age}
{gender}
{marital}
{tuition}
{scholarship}
{debtor}
</fieldset>
<fieldset>
{enrolled}
{approved}
{grade}
{without_evaluations}
</fieldset>
<button type="submit">🔍 Prediksi Risiko Dropout</button>
</form>"#,
        age = number("age", "Usia", form.age, AGE_MIN, AGE_MAX, "1"),
        gender = select("gender", "Jenis Kelamin", form.gender),
        marital = select("marital_status", "Status Pernikahan", form.marital_status),
        tuition = select("tuition_fees_up_to_date", "Biaya Kuliah Tepat Waktu?", form.tuition_fees_up_to_date),
        scholarship = select("scholarship_holder", "Penerima Beasiswa?", form.scholarship_holder),
        debtor = select("debtor", "Memiliki Hutang?", form.debtor),
        enrolled = number("enrolled_1st", "Jumlah Mata Kuliah Diambil (Semester 1)", form.enrolled_1st, UNITS_MIN, UNITS_MAX, "1"),
        approved = number("approved_1st", "Jumlah Mata Kuliah Lulus (Semester 1)", form.approved_1st, UNITS_MIN, UNITS_MAX, "1"),
        grade = number("grade_1st", "Rata-rata Nilai Semester 1", form.grade_1st, GRADE_MIN, GRADE_MAX, &grade_step),
    )
}

fn result_section(assessment: &Assessment) -> String {
    let band = &assessment.band;
    format!(
        r#"<hr>
<section class="result">
<h3>📊 Hasil Prediksi</h3>
<div class="category {class}" style="font-size: 24px; font-weight: bold; color: {color};">{icon} {label}</div>
<div class="metric"><span>Probabilitas Dropout</span> <strong>{percent}</strong></div>
<p class="advice {class}">{advice}</p>
</section>"#,
        class = band.category.as_str(),
        color = escape(&band.color),
        icon = escape(&band.icon),
        label = escape(&band.label),
        percent = escape(&band.probability_display),
        advice = escape(&band.advice),
    )
}

fn error_section(message: &str) -> String {
    format!(r#"<hr><section class="error"><p>❌ {}</p></section>"#, escape(message))
}

fn page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 720px; margin: 2rem auto; }}
fieldset {{ display: grid; grid-template-columns: 1fr 1fr; gap: 0.75rem; border: none; }}
label {{ display: flex; flex-direction: column; }}
.advice.safe {{ background: #e6f4ea; padding: 0.75rem; }}
.advice.warning {{ background: #fff4e0; padding: 0.75rem; }}
.advice.high_risk {{ background: #fde8e8; padding: 0.75rem; }}
.error {{ color: #B22222; }}
</style>
</head>
<body>
<header>
<h1>Welcome to Jaya Jaya Institute</h1>
<h3>Risk Prediction for Students</h3>
<p><em>Early Warning System untuk Memantau Perkembangan Mahasiswa</em></p>
</header>
<hr>
{body}
</body>
</html>"#,
        title = APP_NAME,
    )
}

/// Empty form, or the form re-filled with a submission
pub fn form_page(form: &PredictForm, profile: FeatureProfile) -> String {
    page(&form_section(form, profile))
}

/// Form plus the prediction
pub fn result_page(form: &PredictForm, profile: FeatureProfile, assessment: &Assessment) -> String {
    page(&format!("{}\n{}", form_section(form, profile), result_section(assessment)))
}

/// Form plus the reason the submission failed
pub fn error_page(form: Option<&PredictForm>, profile: FeatureProfile, message: &str) -> String {
    let form = form
        .map(|f| form_section(f, profile))
        .unwrap_or_default();
    page(&format!("{}\n{}", form, error_section(message)))
}
