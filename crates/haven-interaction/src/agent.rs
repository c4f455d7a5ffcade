//! Generative-agent boundary.
//!
//! The engine never talks to a model API directly; it goes through the
//! [`GenerativeAgent`] trait so the transport can be swapped or mocked.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// A single completion request at the model boundary.
///
/// The caller selects `temperature` and `max_tokens` based on session
/// state and emotional intensity before the request reaches the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Fixed instruction prompt establishing the companion's behavior
    pub system_prompt: String,
    /// Turn prompt embedding the user message and session context
    pub user_prompt: String,
    /// Sampling temperature in [0, 1]
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

/// Errors raised at the agent boundary.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The agent could not be constructed or could not run at all
    #[error("Agent execution failed: {0}")]
    ExecutionFailed(String),

    /// The remote endpoint rejected or failed the request
    #[error("Agent process error ({status_code:?}): {message}")]
    Process {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// The endpoint answered but the body could not be understood
    #[error("Agent response parse error: {0}")]
    Parse(String),
}

impl AgentError {
    /// True when the caller may reasonably retry the request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Process {
                is_retryable: true,
                ..
            }
        )
    }
}

/// An agent that turns a completion request into raw model text.
///
/// Implementations perform the only suspension point in the system (the
/// network call); everything around them is synchronous and pure.
#[async_trait]
pub trait GenerativeAgent: Send + Sync {
    /// Executes one completion. The returned string is the raw completion
    /// text; it is NOT guaranteed to be well-formed JSON.
    async fn complete(&self, request: CompletionRequest) -> Result<String, AgentError>;
}
