//! Session summary export.

use super::model::SessionState;
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of a session, suitable for display or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Seconds since the first recorded message (0 for an empty session)
    pub duration_seconds: i64,
    /// Total messages recorded
    pub message_count: usize,
    /// User-authored messages
    pub user_message_count: usize,
    /// Current session state
    pub current_state: SessionState,
    /// Whether a grounding exercise has been offered
    pub grounding_offered: bool,
    /// Accumulated themes
    pub themes: Vec<String>,
    /// Accumulated coping strategies
    pub coping_strategies: Vec<String>,
    /// Mean intensity across user messages (0 when there are none)
    pub average_intensity: f32,
}
