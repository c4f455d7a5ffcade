//! Lexical affect classification.
//!
//! Maps raw message text to an [`EmotionalState`] by counting phrase
//! occurrences against fixed tables. Deterministic, pure, no I/O.

use super::lexicon::{
    count_occurrences, EMOTION_PATTERNS, IMMEDIACY_MARKERS, INTENSITY_MODIFIERS,
};
use super::model::{Emotion, EmotionalState};

/// Classification strategy for a single user message.
///
/// The phrase-table classifier is the default implementation; a learned
/// model can replace it without touching the session machinery or parser.
pub trait AffectClassifier: Send + Sync {
    /// Produces an emotional reading for `text`. Must never fail: any
    /// input, including empty text, yields a valid state.
    fn classify(&self, text: &str) -> EmotionalState;
}

/// Phrase-table implementation of [`AffectClassifier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }

    fn detect_primary_emotion(text: &str) -> Emotion {
        let mut best = Emotion::Neutral;
        let mut best_score = 0usize;

        for (emotion, patterns) in EMOTION_PATTERNS {
            let score: usize = patterns
                .iter()
                .map(|pattern| count_occurrences(text, pattern))
                .sum();
            // Strict comparison: on a tie the earlier declared label wins.
            if score > best_score {
                best = *emotion;
                best_score = score;
            }
        }

        if best_score == 0 {
            Emotion::Neutral
        } else {
            best
        }
    }

    fn calculate_intensity(text: &str, primary: Emotion) -> f32 {
        // Neutral messages stay low regardless of modifiers.
        if primary == Emotion::Neutral {
            return 0.1;
        }

        let mut intensity = 0.5;
        for (phrases, modifier) in INTENSITY_MODIFIERS {
            if phrases.iter().any(|phrase| text.contains(phrase)) {
                intensity += modifier;
            }
        }
        intensity.clamp(0.0, 1.0)
    }

    fn assess_risk(text: &str, primary: Emotion, intensity: f32) -> f32 {
        let mut risk: f32 = match primary {
            Emotion::Crisis => 0.8,
            Emotion::Depression => 0.4,
            Emotion::Anxiety => 0.3,
            _ => 0.0,
        };

        risk += intensity * 0.2;

        if IMMEDIACY_MARKERS
            .iter()
            .any(|marker| text.contains(marker))
        {
            risk += 0.3;
        }

        risk.clamp(0.0, 1.0)
    }
}

impl AffectClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> EmotionalState {
        let text = text.to_lowercase();
        if text.trim().is_empty() {
            return EmotionalState::neutral();
        }

        let primary = Self::detect_primary_emotion(&text);
        let intensity = Self::calculate_intensity(&text, primary);
        let risk_level = Self::assess_risk(&text, primary, intensity);

        EmotionalState::new(primary, intensity, risk_level)
    }
}
