//! Field Schema Registry: the thirteen clinical measurements collected from the operator.
//!
//! The registry is a static table, read-only for the life of the process. Domains are
//! descriptive; nothing in the submission path enforces them (see [`FieldDefinition::admits`]).

use serde::Serialize;

use crate::error::{Result, RiskError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Numeric,
    Categorical,
}

/// One allowed code of a categorical field, with its display label
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Choice {
    pub code: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Domain {
    Range { min: f64, max: f64, step: f64 },
    Choices { options: &'static [Choice] },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub domain: Domain,
    pub required: bool,
    /// Input hint shown next to the field
    pub hint: &'static str,
}

impl FieldDefinition {
    const fn numeric(
        name: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        step: f64,
        required: bool,
        hint: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Numeric,
            domain: Domain::Range { min, max, step },
            required,
            hint,
        }
    }

    const fn categorical(
        name: &'static str,
        label: &'static str,
        options: &'static [Choice],
        required: bool,
        hint: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Categorical,
            domain: Domain::Choices { options },
            required,
            hint,
        }
    }

    /// Whether a raw value lies inside this field's domain.
    ///
    /// Empty values are admitted: presence is the Validator's concern, not the domain's.
    /// Advisory only; neither the store nor the Validator call this.
    pub fn admits(&self, raw: &str) -> bool {
        let raw = raw.trim();
        if raw.is_empty() {
            return true;
        }
        match self.domain {
            Domain::Range { min, max, .. } => raw
                .parse::<f64>()
                .map(|v| v.is_finite() && v >= min && v <= max)
                .unwrap_or(false),
            Domain::Choices { options } => options.iter().any(|c| c.code == raw),
        }
    }

    /// Display label for a categorical code, if the code is known
    pub fn choice_label(&self, code: &str) -> Option<&'static str> {
        match self.domain {
            Domain::Choices { options } => {
                options.iter().find(|c| c.code == code).map(|c| c.label)
            }
            Domain::Range { .. } => None,
        }
    }
}

const SEX: &[Choice] = &[
    Choice { code: "1", label: "Male" },
    Choice { code: "0", label: "Female" },
];

const CHEST_PAIN: &[Choice] = &[
    Choice { code: "0", label: "Typical Angina" },
    Choice { code: "1", label: "Atypical Angina" },
    Choice { code: "2", label: "Non-anginal Pain" },
    Choice { code: "3", label: "Asymptomatic" },
];

const FASTING_SUGAR: &[Choice] = &[
    Choice { code: "1", label: "High (> 120 mg/dl)" },
    Choice { code: "0", label: "Normal (<= 120 mg/dl)" },
];

const REST_ECG: &[Choice] = &[
    Choice { code: "0", label: "Normal" },
    Choice { code: "1", label: "ST-T Wave Abnormality" },
    Choice { code: "2", label: "Left Ventricular Hypertrophy" },
];

const YES_NO: &[Choice] = &[
    Choice { code: "1", label: "Yes" },
    Choice { code: "0", label: "No" },
];

const SLOPE: &[Choice] = &[
    Choice { code: "0", label: "Upsloping" },
    Choice { code: "1", label: "Flat" },
    Choice { code: "2", label: "Downsloping" },
];

const THALASSEMIA: &[Choice] = &[
    Choice { code: "1", label: "Normal" },
    Choice { code: "2", label: "Fixed Defect" },
    Choice { code: "3", label: "Reversible Defect" },
];

static FIELDS: [FieldDefinition; 13] = [
    FieldDefinition::numeric("age", "Age", 1.0, 120.0, 1.0, true, "Enter age"),
    FieldDefinition::categorical("sex", "Gender", SEX, true, "Select gender"),
    FieldDefinition::categorical("cp", "Chest Pain Type", CHEST_PAIN, true, "Select type"),
    FieldDefinition::numeric("trestbps", "Resting BP (mm Hg)", 90.0, 200.0, 1.0, true, "90-200"),
    FieldDefinition::numeric("chol", "Cholesterol (mg/dl)", 125.0, 200.0, 1.0, true, "125-200"),
    FieldDefinition::categorical("fbs", "Fasting Blood Sugar", FASTING_SUGAR, false, "Select"),
    FieldDefinition::categorical("restecg", "Resting ECG", REST_ECG, false, "Select result"),
    FieldDefinition::numeric("thalach", "Max Heart Rate", 70.0, 202.0, 1.0, false, "70-202"),
    FieldDefinition::categorical("exang", "Exercise Angina", YES_NO, false, "Select"),
    FieldDefinition::numeric("oldpeak", "ST Depression (Oldpeak)", 0.0, 6.2, 0.1, false, "0.0 - 6.2"),
    FieldDefinition::categorical("slope", "Slope", SLOPE, false, "Select slope"),
    FieldDefinition::numeric("ca", "Major Vessels (0-4)", 0.0, 4.0, 1.0, false, "0-4"),
    FieldDefinition::categorical("thal", "Thalassemia", THALASSEMIA, false, "Select type"),
];

/// All field definitions, in display order
pub fn fields() -> &'static [FieldDefinition] {
    &FIELDS
}

pub fn lookup(name: &str) -> Result<&'static FieldDefinition> {
    FIELDS
        .iter()
        .find(|f| f.name == name)
        .ok_or_else(|| RiskError::UnknownField(name.to_string()))
}
