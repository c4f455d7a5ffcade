//! Emotion/risk classification for user messages.

pub mod classifier;
pub mod lexicon;
pub mod model;

pub use classifier::{AffectClassifier, LexiconClassifier};
pub use model::{Emotion, EmotionalState, ResponseMode};
