//! Session domain model and dialogue state machine.
//!
//! A `Session` owns the full conversation history for one dialogue and
//! derives its state from the most recent user messages. The state is a
//! pure function of message history and can always be recomputed from it.

use super::message::Message;
use super::summary::SessionSummary;
use crate::affect::EmotionalState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How many trailing messages the state machine looks at.
const RECENT_WINDOW: usize = 3;

/// Risk level above which a session escalates to `Crisis`.
const CRISIS_RISK_THRESHOLD: f32 = 0.7;

/// Intensity above which a session escalates to `NeedsGrounding`.
const GROUNDING_INTENSITY_THRESHOLD: f32 = 0.7;

/// Dialogue session states.
///
/// `Closing` is only entered through an explicit [`Session::close`] call;
/// the state machine never self-transitions into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Initial,
    Active,
    NeedsGrounding,
    Crisis,
    Closing,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Initial
    }
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Initial => "initial",
            SessionState::Active => "active",
            SessionState::NeedsGrounding => "needs_grounding",
            SessionState::Crisis => "crisis",
            SessionState::Closing => "closing",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single dialogue session.
///
/// Owned by one conversation context and mutated by a single logical
/// caller per turn; concurrent turns on the same session must be
/// serialized by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Conversation history, insertion order significant
    pub messages: Vec<Message>,
    /// Current derived state
    pub state: SessionState,
    /// Therapeutic themes touched on so far; accumulated, never removed
    #[serde(default)]
    pub themes: Vec<String>,
    /// Coping strategies discussed; may repeat across turns
    #[serde(default)]
    pub coping_strategies: Vec<String>,
    /// Sticky flag: a grounding exercise has been offered this session
    #[serde(default)]
    pub grounding_offered: bool,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the session last saw activity
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Creates an empty session in the `Initial` state.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
            state: SessionState::Initial,
            themes: Vec::new(),
            coping_strategies: Vec::new(),
            grounding_offered: false,
            created_at: now,
            last_activity: now,
        }
    }

    /// Appends a user message together with its emotional reading.
    pub fn record_user_message(&mut self, content: impl Into<String>, state: EmotionalState) {
        let message = Message::from_user(content, state);
        self.last_activity = message.timestamp;
        self.messages.push(message);
    }

    /// Appends an assistant message.
    pub fn record_assistant_message(&mut self, content: impl Into<String>) {
        let message = Message::from_assistant(content);
        self.last_activity = message.timestamp;
        self.messages.push(message);
    }

    /// Derives the session state from recent history.
    ///
    /// Pure over the message list and never panics: an empty session is
    /// always `Initial`.
    pub fn evaluate_state(&self) -> SessionState {
        if self.messages.is_empty() {
            return SessionState::Initial;
        }

        let recent_user: Vec<&Message> = self
            .messages
            .iter()
            .rev()
            .take(RECENT_WINDOW)
            .filter(|message| message.is_user)
            .collect();

        if recent_user.iter().any(|message| {
            message
                .emotional_state
                .as_ref()
                .is_some_and(|state| state.risk_level > CRISIS_RISK_THRESHOLD)
        }) {
            return SessionState::Crisis;
        }

        if recent_user.iter().any(|message| {
            message
                .emotional_state
                .as_ref()
                .is_some_and(|state| state.intensity > GROUNDING_INTENSITY_THRESHOLD)
        }) {
            return SessionState::NeedsGrounding;
        }

        if self.messages.len() > 2 {
            SessionState::Active
        } else {
            SessionState::Initial
        }
    }

    /// Re-evaluates and stores the current state.
    ///
    /// A closed session stays `Closing`: only the caller's explicit close
    /// ends a session, and nothing reopens it.
    pub fn refresh_state(&mut self) -> SessionState {
        if self.state != SessionState::Closing {
            self.state = self.evaluate_state();
        }
        self.state
    }

    /// True when a grounding exercise should be offered this turn.
    ///
    /// Returns true at most once per session: the sticky
    /// `grounding_offered` flag gates repeat offers so an elevated
    /// episode interrupts the conversation only once.
    pub fn needs_grounding_exercise(&self) -> bool {
        if self.messages.is_empty() || self.grounding_offered {
            return false;
        }

        self.messages
            .iter()
            .rev()
            .take(RECENT_WINDOW)
            .filter(|message| message.is_user)
            .any(|message| {
                message
                    .emotional_state
                    .as_ref()
                    .is_some_and(|state| state.intensity > GROUNDING_INTENSITY_THRESHOLD)
            })
    }

    /// Marks the one-shot grounding offer as spent.
    pub fn mark_grounding_offered(&mut self) {
        self.grounding_offered = true;
    }

    /// Explicit session close requested by the caller.
    pub fn close(&mut self) {
        self.state = SessionState::Closing;
        self.last_activity = Utc::now();
    }

    /// Records newly surfaced themes, skipping ones already accumulated.
    pub fn note_themes<I>(&mut self, themes: I)
    where
        I: IntoIterator<Item = String>,
    {
        for theme in themes {
            if !self.themes.contains(&theme) {
                self.themes.push(theme);
            }
        }
    }

    /// Records coping strategies discussed this turn.
    ///
    /// Duplicates within the batch are dropped; repeats across turns are
    /// kept so the summary reflects how often a strategy came up.
    pub fn note_coping_strategies<I>(&mut self, strategies: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen_this_update: Vec<String> = Vec::new();
        for strategy in strategies {
            if !seen_this_update.contains(&strategy) {
                seen_this_update.push(strategy.clone());
                self.coping_strategies.push(strategy);
            }
        }
    }

    /// Number of user-authored messages.
    pub fn user_message_count(&self) -> usize {
        self.messages.iter().filter(|message| message.is_user).count()
    }

    /// Exports a point-in-time snapshot of the session.
    pub fn summary(&self) -> SessionSummary {
        let duration_seconds = self
            .messages
            .first()
            .map(|first| (Utc::now() - first.timestamp).num_seconds().max(0))
            .unwrap_or(0);

        let intensities: Vec<f32> = self
            .messages
            .iter()
            .filter(|message| message.is_user)
            .filter_map(|message| message.emotional_state.as_ref())
            .map(|state| state.intensity)
            .collect();

        let average_intensity = if intensities.is_empty() {
            0.0
        } else {
            intensities.iter().sum::<f32>() / intensities.len() as f32
        };

        SessionSummary {
            duration_seconds,
            message_count: self.messages.len(),
            user_message_count: self.user_message_count(),
            current_state: self.state,
            grounding_offered: self.grounding_offered,
            themes: self.themes.clone(),
            coping_strategies: self.coping_strategies.clone(),
            average_intensity,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affect::{Emotion, EmotionalState};

    fn calm() -> EmotionalState {
        EmotionalState::new(Emotion::Neutral, 0.1, 0.0)
    }

    fn intense() -> EmotionalState {
        EmotionalState::new(Emotion::Anxiety, 0.9, 0.4)
    }

    fn risky() -> EmotionalState {
        EmotionalState::new(Emotion::Crisis, 0.6, 0.9)
    }

    #[test]
    fn test_empty_session_is_initial() {
        let session = Session::new();
        assert_eq!(session.evaluate_state(), SessionState::Initial);
    }

    #[test]
    fn test_short_session_stays_initial() {
        let mut session = Session::new();
        session.record_user_message("hi", calm());
        session.record_assistant_message("hello");
        assert_eq!(session.evaluate_state(), SessionState::Initial);
    }

    #[test]
    fn test_longer_session_becomes_active() {
        let mut session = Session::new();
        session.record_user_message("hi", calm());
        session.record_assistant_message("hello");
        session.record_user_message("how are you", calm());
        assert_eq!(session.refresh_state(), SessionState::Active);
    }

    #[test]
    fn test_high_risk_escalates_to_crisis() {
        let mut session = Session::new();
        for _ in 0..3 {
            session.record_user_message("it's bad", risky());
        }
        assert_eq!(session.evaluate_state(), SessionState::Crisis);
    }

    #[test]
    fn test_high_intensity_needs_grounding() {
        let mut session = Session::new();
        session.record_user_message("I'm panicking", intense());
        assert_eq!(session.evaluate_state(), SessionState::NeedsGrounding);
    }

    #[test]
    fn test_crisis_wins_over_grounding() {
        let mut session = Session::new();
        session.record_user_message("panicking", intense());
        session.record_user_message("it's bad", risky());
        assert_eq!(session.evaluate_state(), SessionState::Crisis);
    }

    #[test]
    fn test_old_risk_falls_out_of_window() {
        let mut session = Session::new();
        session.record_user_message("it's bad", risky());
        session.record_assistant_message("please stay with me");
        session.record_user_message("a little better", calm());
        session.record_assistant_message("glad to hear it");
        session.record_user_message("doing okay", calm());
        // The risky message is outside the trailing window of 3.
        assert_eq!(session.evaluate_state(), SessionState::Active);
    }

    #[test]
    fn test_grounding_offer_is_one_shot() {
        let mut session = Session::new();
        session.record_user_message("I'm panicking", intense());
        assert!(session.needs_grounding_exercise());

        session.mark_grounding_offered();
        assert!(!session.needs_grounding_exercise());

        // Still gated even if intensity stays high on later turns.
        session.record_user_message("still overwhelmed", intense());
        assert!(!session.needs_grounding_exercise());
    }

    #[test]
    fn test_close_is_sticky() {
        let mut session = Session::new();
        session.record_user_message("goodbye", calm());
        session.close();
        assert_eq!(session.refresh_state(), SessionState::Closing);
    }

    #[test]
    fn test_themes_accumulate_without_duplicates() {
        let mut session = Session::new();
        session.note_themes(vec!["anxiety".to_string(), "sleep".to_string()]);
        session.note_themes(vec!["anxiety".to_string(), "grief".to_string()]);
        assert_eq!(session.themes, vec!["anxiety", "sleep", "grief"]);
    }

    #[test]
    fn test_coping_strategies_dedup_within_update_only() {
        let mut session = Session::new();
        session.note_coping_strategies(vec![
            "breathing".to_string(),
            "breathing".to_string(),
            "journaling".to_string(),
        ]);
        assert_eq!(session.coping_strategies, vec!["breathing", "journaling"]);

        // A later turn may repeat a strategy.
        session.note_coping_strategies(vec!["breathing".to_string()]);
        assert_eq!(
            session.coping_strategies,
            vec!["breathing", "journaling", "breathing"]
        );
    }

    #[test]
    fn test_summary_average_intensity() {
        let mut session = Session::new();
        session.record_user_message("a", EmotionalState::new(Emotion::Anxiety, 0.4, 0.0));
        session.record_user_message("b", EmotionalState::new(Emotion::Anxiety, 0.8, 0.0));
        session.record_assistant_message("reply");

        let summary = session.summary();
        assert_eq!(summary.message_count, 3);
        assert_eq!(summary.user_message_count, 2);
        assert!((summary.average_intensity - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_summary_of_empty_session() {
        let summary = Session::new().summary();
        assert_eq!(summary.duration_seconds, 0);
        assert_eq!(summary.message_count, 0);
        assert_eq!(summary.average_intensity, 0.0);
    }
}
