use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{
    error::{Result, RiskError},
    form::FormState,
};

/// Fields that must be non-empty before a submission may go out.
/// The remaining registry fields are transmitted but never gate submission.
pub const MANDATORY_FIELDS: [&str; 5] = ["age", "sex", "cp", "trestbps", "chol"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub missing: BTreeSet<String>,
}

impl ValidationResult {
    pub fn into_result(self) -> Result<()> {
        if self.ok {
            Ok(())
        } else {
            Err(RiskError::Validation {
                missing: self.missing.into_iter().collect(),
            })
        }
    }
}

/// Presence check over the mandatory subset. No range or code checks happen here.
pub fn validate(form: &FormState) -> ValidationResult {
    let missing: BTreeSet<String> = MANDATORY_FIELDS
        .iter()
        .filter(|name| form.get(name).is_none_or(str::is_empty))
        .map(|name| name.to_string())
        .collect();

    ValidationResult {
        ok: missing.is_empty(),
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn mandatory_filled() -> FormState {
        [("age", "45"), ("sex", "1"), ("cp", "2"), ("trestbps", "130"), ("chol", "240")]
            .into_iter()
            .fold(FormState::init(), |form, (name, value)| {
                form.update(name, value).unwrap()
            })
    }

    #[test]
    fn mandatory_subset_matches_registry_flags() {
        let required: Vec<_> = schema::fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(required, MANDATORY_FIELDS.to_vec());
    }

    #[test]
    fn empty_form_misses_all_five() {
        let result = validate(&FormState::init());
        assert!(!result.ok);
        assert_eq!(result.missing.len(), 5);
    }

    #[test]
    fn optional_fields_may_stay_empty() {
        let result = validate(&mandatory_filled());
        assert!(result.ok);
        assert!(result.missing.is_empty());
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn each_mandatory_field_is_checked() {
        for name in MANDATORY_FIELDS {
            let form = mandatory_filled().update(name, "").unwrap();
            let result = validate(&form);
            assert!(!result.ok, "{name}");
            assert_eq!(result.missing.iter().collect::<Vec<_>>(), vec![name]);
        }
    }

    #[test]
    fn whitespace_counts_as_present() {
        let form = mandatory_filled().update("chol", " ").unwrap();
        assert!(validate(&form).ok);
    }

    #[test]
    fn failure_converts_to_validation_error() {
        let form = mandatory_filled().update("cp", "").unwrap();
        let err = validate(&form).into_result().unwrap_err();
        assert!(matches!(err, RiskError::Validation { missing } if missing == vec!["cp"]));
    }
}
