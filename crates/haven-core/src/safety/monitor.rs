//! Crisis phrase monitoring.
//!
//! Scans message text against per-category phrase tables, independent of
//! the affect classifier, and produces a [`RiskAssessment`] with an
//! escalation tier and resource payload.

use super::model::{RiskAssessment, RiskCategory, RiskTier};

/// Phrase tables per crisis category, in table order.
const CRISIS_PATTERNS: &[(RiskCategory, &[&str])] = &[
    (
        RiskCategory::SuicideRisk,
        &[
            "suicide",
            "kill myself",
            "end my life",
            "better off dead",
            "want to die",
            "don't want to live",
            "end it all",
        ],
    ),
    (
        RiskCategory::SelfHarm,
        &[
            "hurt myself",
            "harm myself",
            "cut myself",
            "self-harm",
            "self harm",
            "inflict pain",
            "burning myself",
            "hitting myself",
        ],
    ),
    (
        RiskCategory::Abuse,
        &[
            "abused",
            "hitting me",
            "threatening me",
            "scared of them",
            "violent",
            "trapped",
            "controlling me",
        ],
    ),
];

/// Emergency/immediacy phrases. These escalate the tier but are never
/// reported as a detected category.
const EMERGENCY_PATTERNS: &[&str] = &[
    "right now",
    "about to",
    "going to",
    "have the means",
    "wrote a note",
    "made a plan",
    "ready to",
];

/// Resource bundles keyed by category: a concern message plus hotline list.
const CRISIS_RESOURCES: &[(RiskCategory, &str, &[&str])] = &[
    (
        RiskCategory::SuicideRisk,
        "I'm very concerned about your safety. Please know that you're not alone.",
        &[
            "988 Suicide & Crisis Lifeline (call or text 988)",
            "Crisis Text Line (text HOME to 741741)",
            "Emergency: Call 911",
        ],
    ),
    (
        RiskCategory::SelfHarm,
        "I hear your pain. Your safety is important.",
        &[
            "Crisis Text Line (text HOME to 741741)",
            "Self-harm Crisis Helpline: 1-800-366-8288",
        ],
    ),
    (
        RiskCategory::Abuse,
        "Your safety is paramount. There are people who can help.",
        &[
            "National Domestic Violence Hotline: 1-800-799-SAFE (7233)",
            "Emergency: Call 911",
        ],
    ),
];

const DEFAULT_CONCERN: &str = "I'm concerned about your wellbeing and safety.";

const EMERGENCY_DIRECTIVE: &str = "IMMEDIATE ACTION REQUIRED: Please call emergency services \
(911) or reach out to a crisis hotline immediately.";

/// Safety assessment strategy for a single user message.
///
/// Kept as a trait so the phrase-table monitor can be swapped for a
/// learned classifier without touching the turn pipeline.
pub trait SafetyAssessor: Send + Sync {
    /// Assesses `text` for crisis content. Pure over the configured tables.
    fn assess(&self, text: &str) -> RiskAssessment;
}

/// Phrase-table implementation of [`SafetyAssessor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CrisisPhraseMonitor;

impl CrisisPhraseMonitor {
    pub fn new() -> Self {
        Self
    }

    fn detect_categories(text: &str) -> Vec<RiskCategory> {
        CRISIS_PATTERNS
            .iter()
            .filter(|(_, patterns)| patterns.iter().any(|pattern| text.contains(pattern)))
            .map(|(category, _)| *category)
            .collect()
    }

    fn build_response(categories: &[RiskCategory], immediate_action: bool) -> (String, Vec<String>) {
        let mut message = DEFAULT_CONCERN.to_string();
        let mut resources = Vec::new();

        for category in categories {
            if let Some((_, concern, bundle)) = CRISIS_RESOURCES
                .iter()
                .find(|(candidate, _, _)| candidate == category)
            {
                message = (*concern).to_string();
                resources.extend(bundle.iter().map(|resource| (*resource).to_string()));
            }
        }

        if immediate_action {
            resources.push(EMERGENCY_DIRECTIVE.to_string());
        }

        (message, resources)
    }
}

impl SafetyAssessor for CrisisPhraseMonitor {
    fn assess(&self, text: &str) -> RiskAssessment {
        let text = text.to_lowercase();

        let categories = Self::detect_categories(&text);
        if categories.is_empty() {
            return RiskAssessment::normal();
        }

        let immediate_action = EMERGENCY_PATTERNS
            .iter()
            .any(|pattern| text.contains(pattern));

        let tier = if immediate_action || categories.contains(&RiskCategory::SuicideRisk) {
            RiskTier::Severe
        } else {
            // Any detected category escalates to at least High.
            RiskTier::High
        };

        let (message, resources) = Self::build_response(&categories, immediate_action);

        RiskAssessment {
            tier,
            categories,
            immediate_action,
            message,
            resources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assess(text: &str) -> RiskAssessment {
        CrisisPhraseMonitor::new().assess(text)
    }

    #[test]
    fn test_clean_text_is_normal() {
        let verdict = assess("I had a pretty good day at work today");
        assert_eq!(verdict.tier, RiskTier::Normal);
        assert!(verdict.categories.is_empty());
        assert!(!verdict.immediate_action);
        assert!(verdict.resources.is_empty());
    }

    #[test]
    fn test_suicide_phrase_is_severe() {
        let verdict = assess("I want to kill myself");
        assert_eq!(verdict.tier, RiskTier::Severe);
        assert_eq!(verdict.categories, vec![RiskCategory::SuicideRisk]);
        assert!(!verdict.resources.is_empty());
    }

    #[test]
    fn test_single_category_without_emergency_is_high() {
        let verdict = assess("sometimes I think about wanting to cut myself");
        assert_eq!(verdict.tier, RiskTier::High);
        assert_eq!(verdict.categories, vec![RiskCategory::SelfHarm]);
        assert!(!verdict.immediate_action);
    }

    #[test]
    fn test_emergency_phrase_forces_severe_and_directive() {
        let verdict = assess("I'm going to kill myself tonight");
        assert_eq!(verdict.tier, RiskTier::Severe);
        assert!(verdict.immediate_action);
        assert!(!verdict.resources.is_empty());
        assert!(verdict
            .resources
            .last()
            .unwrap()
            .starts_with("IMMEDIATE ACTION REQUIRED"));
    }

    #[test]
    fn test_emergency_alone_is_not_a_category() {
        // Immediacy phrasing with no crisis category stays normal.
        let verdict = assess("I'm going to the store right now");
        assert_eq!(verdict.tier, RiskTier::Normal);
        assert!(verdict.categories.is_empty());
    }

    #[test]
    fn test_multiple_categories_in_table_order() {
        let verdict = assess("he keeps hitting me and I hurt myself afterwards");
        assert_eq!(
            verdict.categories,
            vec![RiskCategory::SelfHarm, RiskCategory::Abuse]
        );
        assert_eq!(verdict.tier, RiskTier::High);
        // Resources from both bundles are appended in order.
        assert!(verdict.resources.len() >= 4);
    }

    #[test]
    fn test_abuse_resources_present() {
        let verdict = assess("my partner keeps threatening me and I feel trapped");
        assert_eq!(verdict.categories, vec![RiskCategory::Abuse]);
        assert!(verdict
            .resources
            .iter()
            .any(|resource| resource.contains("Domestic Violence")));
    }

    #[test]
    fn test_case_insensitive() {
        let verdict = assess("I WANT TO DIE");
        assert_eq!(verdict.tier, RiskTier::Severe);
    }
}
