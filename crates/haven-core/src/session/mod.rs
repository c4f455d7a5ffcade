//! Per-session dialogue state.

pub mod message;
pub mod model;
pub mod summary;

pub use message::Message;
pub use model::{Session, SessionState};
pub use summary::SessionSummary;
