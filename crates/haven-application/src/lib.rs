//! Haven application: per-turn orchestration.
//!
//! Wires the core engine to the generative-model boundary and guarantees
//! the user always receives a reply for every turn.

pub mod companion;
pub mod insights;

pub use companion::{Companion, TurnOutcome};
