//! Prompt construction for the generative model.
//!
//! Templates are embedded and rendered with minijinja. The turn prompt
//! carries the user message, the classifier's reading, and a one-line
//! session summary so the model can respond in context.

use haven_core::affect::{EmotionalState, ResponseMode};
use haven_core::error::{HavenError, Result};
use haven_core::session::Session;
use minijinja::{context, Environment};

/// Fixed instruction prompt establishing the companion's behavior.
const SYSTEM_PROMPT: &str = "\
You are Haven, a supportive wellness companion focused on mental well-being. You provide:
1. Empathetic, non-judgmental listening
2. Evidence-based coping strategies
3. Mindfulness techniques
4. Emotional support and validation

Guidelines:
- Maintain appropriate boundaries
- Use a warm, supportive tone
- Focus on validation and reflection before suggesting solutions
- Structure responses to be clear and calming

Keep responses concise and human-like. Don't mention that you're an AI.

Always provide responses in the following JSON format:
{
    \"reflection\": \"Mirror the user's emotions\",
    \"validation\": \"Validate their experience\",
    \"support\": \"Offer gentle support or coping strategy\",
    \"question\": \"Optional follow-up question for exploration\",
    \"safety_note\": \"Include if crisis indicators detected\"
}";

const TURN_TEMPLATE: &str = "\
Analyze the following message with empathy and respond with a JSON object containing these exact keys: reflection, validation, support, question, safety_note.

The user currently sounds {{ primary_emotion }} (intensity {{ intensity }}). Aim for a {{ response_mode }} response.
Session so far: state {{ session_state }}, {{ user_message_count }} user message(s){% if themes %}, themes discussed: {{ themes | join(', ') }}{% endif %}.

User message: {{ user_message }}

Return ONLY the JSON object, no additional text.";

/// Renders the system and per-turn prompts.
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_template("turn", TURN_TEMPLATE)
            .expect("embedded turn template is valid");
        Self { env }
    }

    /// The fixed system prompt.
    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    /// Renders the turn prompt for one user message.
    pub fn turn_prompt(
        &self,
        user_message: &str,
        state: &EmotionalState,
        session: &Session,
    ) -> Result<String> {
        let template = self
            .env
            .get_template("turn")
            .map_err(|err| HavenError::internal(format!("Missing turn template: {err}")))?;

        template
            .render(context! {
                user_message => user_message,
                primary_emotion => state.primary_emotion.as_str(),
                intensity => format!("{:.1}", state.intensity),
                response_mode => mode_phrase(state.response_mode()),
                session_state => session.state.as_str(),
                user_message_count => session.user_message_count(),
                themes => session.themes.clone(),
            })
            .map_err(|err| HavenError::internal(format!("Failed to render turn prompt: {err}")))
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn mode_phrase(mode: ResponseMode) -> &'static str {
    match mode {
        ResponseMode::CrisisIntervention => "crisis-intervention",
        ResponseMode::Grounding => "grounding",
        ResponseMode::EmotionalSupport => "emotional-support",
        ResponseMode::RapportBuilding => "rapport-building",
        ResponseMode::Exploration => "gentle-exploration",
    }
}
