//! Haven interaction: the generative-model boundary.
//!
//! Defines the agent seam ([`GenerativeAgent`]), a local OpenAI-compatible
//! HTTP agent, prompt construction, and sampling-parameter selection.

pub mod agent;
pub mod local_api_agent;
pub mod prompt;
pub mod sampling;

pub use agent::{AgentError, CompletionRequest, GenerativeAgent};
pub use local_api_agent::LocalApiAgent;
pub use prompt::PromptBuilder;
pub use sampling::SamplingParams;
