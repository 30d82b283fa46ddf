use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, RiskError};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/predict";
pub const ENDPOINT_ENV: &str = "RISK_PREDICTION_URL";
pub const RESPONSE_POLICY_ENV: &str = "RISK_RESPONSE_POLICY";

/// How a received response without a usable `result` is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePolicy {
    /// Resolve to success with an absent result, and log a warning
    #[default]
    Lenient,
    /// Resolve to a failure carrying the service's error, if any
    Strict,
}

impl FromStr for ResponsePolicy {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(RiskError::Config(format!(
                "unknown response policy '{other}', expected 'lenient' or 'strict'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub endpoint: String,
    pub response_policy: ResponsePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            response_policy: ResponsePolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `RISK_PREDICTION_URL` and `RISK_RESPONSE_POLICY`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            config.endpoint = endpoint;
        }
        if let Some(policy) = lookup(RESPONSE_POLICY_ENV) {
            config.response_policy = policy.parse()?;
        }
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_response_policy(mut self, policy: ResponsePolicy) -> Self {
        self.response_policy = policy;
        self
    }
}
