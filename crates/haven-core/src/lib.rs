//! Haven core: the Dialogue Safety & State Engine.
//!
//! Pure, synchronous building blocks for a supportive-dialogue companion:
//!
//! - [`affect`] classifies user text into an emotional reading
//! - [`safety`] independently scans text for crisis phrases
//! - [`session`] holds per-conversation history and derives its state
//! - [`reply`] parses malformed model output and composes display text
//!
//! The generative-model transport lives in `haven-interaction`; the
//! per-turn orchestration lives in `haven-application`.

pub mod affect;
pub mod config;
pub mod error;
pub mod reply;
pub mod safety;
pub mod session;

// Re-export common error type
pub use error::{HavenError, Result};
