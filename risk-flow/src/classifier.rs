use serde::{Deserialize, Serialize};
use std::fmt;

pub const HIGH_RISK_LABEL: &str = "High Risk";
pub const MEDIUM_RISK_LABEL: &str = "Medium Risk";

/// Severity tier used to render a prediction label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

/// Total mapping from a service label to a tier; anything unrecognised is `Low`.
pub fn classify(result: &str) -> RiskTier {
    match result {
        HIGH_RISK_LABEL => RiskTier::High,
        MEDIUM_RISK_LABEL => RiskTier::Medium,
        _ => RiskTier::Low,
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTier::High => "high",
            RiskTier::Medium => "medium",
            RiskTier::Low => "low",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels() {
        assert_eq!(classify("High Risk"), RiskTier::High);
        assert_eq!(classify("Medium Risk"), RiskTier::Medium);
        assert_eq!(classify("Low Risk"), RiskTier::Low);
    }

    #[test]
    fn everything_else_is_low() {
        assert_eq!(classify("Anything else"), RiskTier::Low);
        assert_eq!(classify(""), RiskTier::Low);
        assert_eq!(classify("high risk"), RiskTier::Low);
        assert_eq!(classify("Heart Disease Detected"), RiskTier::Low);
    }
}
