use serde::Serialize;
use std::collections::BTreeMap;

use crate::{error::Result, schema};

/// Raw operator input for every registered field.
///
/// Every registry field is always present; values are kept exactly as typed.
/// Updates never mutate in place, they return a new `FormState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormState {
    values: BTreeMap<String, String>,
}

impl FormState {
    /// A form with every field set to the empty string
    pub fn init() -> Self {
        Self {
            values: schema::fields()
                .iter()
                .map(|f| (f.name.to_string(), String::new()))
                .collect(),
        }
    }

    /// Replace the value of `name`, leaving every other field untouched
    pub fn update(&self, name: &str, value: impl Into<String>) -> Result<Self> {
        schema::lookup(name)?;
        let mut values = self.values.clone();
        values.insert(name.to_string(), value.into());
        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fields whose current value falls outside the registered domain.
    /// Purely informational; submission never consults this.
    pub fn advisories(&self) -> Vec<String> {
        schema::fields()
            .iter()
            .filter(|f| !f.admits(self.get(f.name).unwrap_or_default()))
            .map(|f| f.name.to_string())
            .collect()
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::init()
    }
}

/// Body of the POST sent to the prediction service: the form, verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PredictionRequest(FormState);

impl PredictionRequest {
    pub fn form(&self) -> &FormState {
        &self.0
    }
}

impl From<&FormState> for PredictionRequest {
    fn from(form: &FormState) -> Self {
        Self(form.clone())
    }
}
