//! Structured replies: parsing model output and composing display text.

pub mod composer;
pub mod model;
pub mod parser;

pub use composer::compose_reply;
pub use model::StructuredReply;
pub use parser::parse_reply;
