//! Structured reply model and canned replies.
//!
//! The generative model is instructed to answer with a fixed-shape JSON
//! object; `StructuredReply` is that shape. Canned instances cover the
//! turns where the model is bypassed or unavailable.

use crate::affect::Emotion;
use crate::safety::RiskAssessment;
use serde::{Deserialize, Serialize};

/// The fixed-shape reply produced for every turn.
///
/// All fields are free text and any of them may be empty. A reply is
/// produced fresh per turn and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuredReply {
    /// Mirrors the user's emotions back to them
    #[serde(default)]
    pub reflection: String,
    /// Validates the user's experience
    #[serde(default)]
    pub validation: String,
    /// Gentle support or a coping strategy
    #[serde(default)]
    pub support: String,
    /// Optional follow-up question
    #[serde(default)]
    pub question: String,
    /// Crisis note, set when safety indicators were detected
    #[serde(default)]
    pub safety_note: String,
}

impl StructuredReply {
    /// Greeting shown when an interactive session starts.
    pub fn welcome() -> Self {
        Self {
            reflection: "Welcome to Haven".to_string(),
            validation: "I'm here to provide a supportive space for you".to_string(),
            support: "Feel free to share whatever is on your mind".to_string(),
            question: "How are you feeling today?".to_string(),
            safety_note: String::new(),
        }
    }

    /// Farewell shown when the user ends the session.
    pub fn farewell() -> Self {
        Self {
            reflection: "Thank you for sharing with me today".to_string(),
            validation: "Your willingness to open up is appreciated".to_string(),
            support: "Remember that seeking support is a sign of strength".to_string(),
            question: String::new(),
            safety_note: String::new(),
        }
    }

    /// Reply used when the transport to the generative model fails.
    pub fn fallback() -> Self {
        Self {
            reflection: "I understand you're reaching out".to_string(),
            validation: "Your feelings are important".to_string(),
            support: "I'm here to listen".to_string(),
            question: "Would you like to tell me more?".to_string(),
            safety_note: String::new(),
        }
    }

    /// Reply for empty or whitespace-only user input.
    pub fn prompt_for_input() -> Self {
        Self {
            reflection: String::new(),
            validation: String::new(),
            support: "I didn't catch that".to_string(),
            question: "Could you please say something?".to_string(),
            safety_note: String::new(),
        }
    }

    /// Apologetic reply for an unexpected internal failure.
    pub fn apology() -> Self {
        Self {
            reflection: String::new(),
            validation: String::new(),
            support: "I apologize, but I'm having trouble processing your message".to_string(),
            question: "Could you try rephrasing it?".to_string(),
            safety_note: String::new(),
        }
    }

    /// Crisis short-circuit reply, carrying the monitor's resource payload.
    pub fn crisis(assessment: &RiskAssessment) -> Self {
        let safety_note = if assessment.resources.is_empty() {
            "Please reach out to crisis support: Emergency Services (911) or Crisis Text Line (988)"
                .to_string()
        } else {
            let mut note = assessment.message.clone();
            if !note.is_empty() {
                note.push(' ');
            }
            note.push_str(&assessment.resources.join("; "));
            note
        };

        Self {
            reflection: "I hear that you're in significant pain right now".to_string(),
            validation: "What you're going through is serious and you deserve support".to_string(),
            support: "While I'm here to listen, it's important to get professional help".to_string(),
            question: String::new(),
            safety_note,
        }
    }

    /// One-shot grounding exercise offer for high-intensity episodes.
    pub fn grounding() -> Self {
        Self {
            reflection: "It sounds like things feel very intense right now".to_string(),
            validation: "It's okay to pause and take a moment to steady yourself".to_string(),
            support: "Let's try a short grounding exercise: name five things you can see, \
                      four you can touch, three you can hear, two you can smell, and one \
                      you can taste"
                .to_string(),
            question: "Would you like to try that together?".to_string(),
            safety_note: String::new(),
        }
    }

    /// Corrective reply when the model greets mid-conversation.
    pub fn regrounded_in_conversation(emotion: Emotion) -> Self {
        Self {
            reflection: format!("I understand that you're feeling {}", emotion),
            validation: "It's completely normal to feel this way".to_string(),
            support: "Let's work through this together".to_string(),
            question: "Can you tell me more about what's causing these feelings?".to_string(),
            safety_note: String::new(),
        }
    }

    /// True when every field is empty.
    pub fn is_empty(&self) -> bool {
        self.reflection.is_empty()
            && self.validation.is_empty()
            && self.support.is_empty()
            && self.question.is_empty()
            && self.safety_note.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::{CrisisPhraseMonitor, SafetyAssessor};

    #[test]
    fn test_default_is_empty() {
        assert!(StructuredReply::default().is_empty());
        assert!(!StructuredReply::welcome().is_empty());
    }

    #[test]
    fn test_partial_json_decodes_with_empty_fields() {
        let reply: StructuredReply =
            serde_json::from_str(r#"{"reflection": "I hear you"}"#).unwrap();
        assert_eq!(reply.reflection, "I hear you");
        assert!(reply.validation.is_empty());
        assert!(reply.safety_note.is_empty());
    }

    #[test]
    fn test_crisis_reply_embeds_resources() {
        let assessment = CrisisPhraseMonitor::new().assess("I want to kill myself right now");
        let reply = StructuredReply::crisis(&assessment);
        assert!(reply.safety_note.contains("988"));
        assert!(reply.safety_note.contains("IMMEDIATE ACTION REQUIRED"));
    }

    #[test]
    fn test_crisis_reply_without_resources_uses_fixed_note() {
        let reply = StructuredReply::crisis(&RiskAssessment::normal());
        assert!(reply.safety_note.contains("911"));
    }
}
