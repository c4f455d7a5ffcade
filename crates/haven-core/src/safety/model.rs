//! Risk assessment domain model.

use serde::{Deserialize, Serialize};

/// A crisis category the safety monitor can detect.
///
/// Emergency/immediacy phrases are deliberately not a category: they only
/// escalate the tier of whatever else was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    SuicideRisk,
    SelfHarm,
    Abuse,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::SuicideRisk => "suicide_risk",
            RiskCategory::SelfHarm => "self_harm",
            RiskCategory::Abuse => "abuse",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Escalation tier for a single message.
///
/// Once any category is detected the minimum tier is `High`; there is no
/// separate "low" tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Normal,
    High,
    Severe,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Normal => "normal",
            RiskTier::High => "high",
            RiskTier::Severe => "severe",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The safety monitor's verdict for one message.
///
/// Created per message and not persisted beyond the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Escalation tier
    pub tier: RiskTier,
    /// Categories with at least one matching phrase, in table order
    pub categories: Vec<RiskCategory>,
    /// True when an emergency/immediacy phrase matched
    pub immediate_action: bool,
    /// Concern message chosen from the detected categories
    pub message: String,
    /// Crisis resources to surface to the user, in category order
    pub resources: Vec<String>,
}

impl RiskAssessment {
    /// The all-clear verdict.
    pub fn normal() -> Self {
        Self {
            tier: RiskTier::Normal,
            categories: Vec::new(),
            immediate_action: false,
            message: String::new(),
            resources: Vec::new(),
        }
    }

    /// True when the caller should surface resources to the user.
    pub fn is_elevated(&self) -> bool {
        self.tier >= RiskTier::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(RiskTier::Severe > RiskTier::High);
        assert!(RiskTier::High > RiskTier::Normal);
    }

    #[test]
    fn test_normal_is_not_elevated() {
        assert!(!RiskAssessment::normal().is_elevated());
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&RiskCategory::SuicideRisk).unwrap();
        assert_eq!(json, "\"suicide_risk\"");
    }
}
