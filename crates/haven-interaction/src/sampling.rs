//! Sampling-parameter selection.
//!
//! Temperature tightens as the conversation gets heavier: crisis turns
//! get the most deterministic output, initial contact the most open.
//! The per-situation values come from the engine configuration.

use haven_core::affect::EmotionalState;
use haven_core::config::EngineConfig;
use haven_core::session::SessionState;

/// Intensity above which sampling is tightened.
const HIGH_INTENSITY_THRESHOLD: f32 = 0.7;

/// Parameters for one completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl SamplingParams {
    /// Selects parameters from session state, emotional intensity, and
    /// the configured temperature table.
    pub fn select(
        state: SessionState,
        emotional_state: &EmotionalState,
        config: &EngineConfig,
    ) -> Self {
        let table = &config.temperature;
        let temperature = if state == SessionState::Crisis {
            table.crisis
        } else if emotional_state.intensity > HIGH_INTENSITY_THRESHOLD {
            table.high_intensity
        } else if state == SessionState::Initial {
            table.initial
        } else {
            table.baseline
        };

        Self {
            temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_core::affect::{Emotion, EmotionalState};

    fn with_intensity(intensity: f32) -> EmotionalState {
        EmotionalState::new(Emotion::Anxiety, intensity, 0.2)
    }

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_crisis_is_most_deterministic() {
        let params = SamplingParams::select(SessionState::Crisis, &with_intensity(0.2), &config());
        assert_eq!(params.temperature, 0.2);
    }

    #[test]
    fn test_high_intensity_tightens_sampling() {
        let params = SamplingParams::select(SessionState::Active, &with_intensity(0.9), &config());
        assert_eq!(params.temperature, 0.3);
    }

    #[test]
    fn test_initial_contact_is_moderate() {
        let params = SamplingParams::select(SessionState::Initial, &with_intensity(0.3), &config());
        assert_eq!(params.temperature, 0.5);
    }

    #[test]
    fn test_default_is_balanced() {
        let params = SamplingParams::select(SessionState::Active, &with_intensity(0.3), &config());
        assert_eq!(params.temperature, 0.4);
        assert_eq!(params.max_tokens, 750);
    }

    #[test]
    fn test_crisis_wins_over_intensity() {
        let params = SamplingParams::select(SessionState::Crisis, &with_intensity(0.9), &config());
        assert_eq!(params.temperature, 0.2);
    }

    #[test]
    fn test_configured_table_overrides_defaults() {
        let mut config = EngineConfig::default();
        config.temperature.crisis = 0.05;
        config.temperature.baseline = 0.6;
        config.max_tokens = 256;

        let crisis = SamplingParams::select(SessionState::Crisis, &with_intensity(0.2), &config);
        assert_eq!(crisis.temperature, 0.05);
        assert_eq!(crisis.max_tokens, 256);

        let steady = SamplingParams::select(SessionState::Active, &with_intensity(0.3), &config);
        assert_eq!(steady.temperature, 0.6);
    }
}
