//! Emotional-state domain model.
//!
//! This module contains the types produced by the affect classifier:
//! the fixed emotion label set and the per-message `EmotionalState` record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of emotion labels the classifier can assign.
///
/// Declaration order is significant: when two labels score equally,
/// the first declared label wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Neutral,
    Anxiety,
    Depression,
    Anger,
    Grief,
    Relationship,
    Trauma,
    SelfEsteem,
    Crisis,
}

impl Default for Emotion {
    fn default() -> Self {
        Emotion::Neutral
    }
}

impl Emotion {
    /// Returns the wire/display name of this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Anxiety => "anxiety",
            Emotion::Depression => "depression",
            Emotion::Anger => "anger",
            Emotion::Grief => "grief",
            Emotion::Relationship => "relationship",
            Emotion::Trauma => "trauma",
            Emotion::SelfEsteem => "self_esteem",
            Emotion::Crisis => "crisis",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The emotional reading of a single user message.
///
/// One instance is created per analyzed message and never mutated.
/// `intensity` and `risk_level` are always within `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    /// The dominant emotion label for the message
    pub primary_emotion: Emotion,
    /// Heuristic strength of the expressed affect (0-1 scale)
    pub intensity: f32,
    /// Heuristic likelihood/severity of a safety concern (0-1 scale)
    pub risk_level: f32,
    /// When the message was analyzed
    pub observed_at: DateTime<Utc>,
}

impl EmotionalState {
    /// Creates a new state observed now, clamping both scores into `[0, 1]`.
    pub fn new(primary_emotion: Emotion, intensity: f32, risk_level: f32) -> Self {
        Self {
            primary_emotion,
            intensity: intensity.clamp(0.0, 1.0),
            risk_level: risk_level.clamp(0.0, 1.0),
            observed_at: Utc::now(),
        }
    }

    /// A neutral reading, used for empty or unremarkable input.
    pub fn neutral() -> Self {
        Self::new(Emotion::Neutral, 0.1, 0.0)
    }

    /// Selects the response mode the caller should aim for.
    pub fn response_mode(&self) -> ResponseMode {
        if self.risk_level > 0.7 {
            ResponseMode::CrisisIntervention
        } else if self.intensity > 0.8 {
            ResponseMode::Grounding
        } else if self.intensity > 0.6 {
            ResponseMode::EmotionalSupport
        } else if self.primary_emotion == Emotion::Neutral {
            ResponseMode::RapportBuilding
        } else {
            ResponseMode::Exploration
        }
    }
}

/// The conversational posture suggested by an emotional reading.
///
/// Used by prompt construction to pick instruction templates; it never
/// overrides the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    CrisisIntervention,
    Grounding,
    EmotionalSupport,
    RapportBuilding,
    Exploration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_scores() {
        let state = EmotionalState::new(Emotion::Anxiety, 1.4, -0.2);
        assert_eq!(state.intensity, 1.0);
        assert_eq!(state.risk_level, 0.0);
    }

    #[test]
    fn test_neutral_reading() {
        let state = EmotionalState::neutral();
        assert_eq!(state.primary_emotion, Emotion::Neutral);
        assert_eq!(state.intensity, 0.1);
        assert_eq!(state.risk_level, 0.0);
    }

    #[test]
    fn test_response_mode_thresholds() {
        let crisis = EmotionalState::new(Emotion::Crisis, 0.5, 0.9);
        assert_eq!(crisis.response_mode(), ResponseMode::CrisisIntervention);

        let grounding = EmotionalState::new(Emotion::Anxiety, 0.9, 0.3);
        assert_eq!(grounding.response_mode(), ResponseMode::Grounding);

        let support = EmotionalState::new(Emotion::Depression, 0.7, 0.4);
        assert_eq!(support.response_mode(), ResponseMode::EmotionalSupport);

        let rapport = EmotionalState::neutral();
        assert_eq!(rapport.response_mode(), ResponseMode::RapportBuilding);

        let explore = EmotionalState::new(Emotion::Grief, 0.5, 0.1);
        assert_eq!(explore.response_mode(), ResponseMode::Exploration);
    }

    #[test]
    fn test_emotion_serde_snake_case() {
        let json = serde_json::to_string(&Emotion::SelfEsteem).unwrap();
        assert_eq!(json, "\"self_esteem\"");
    }
}
