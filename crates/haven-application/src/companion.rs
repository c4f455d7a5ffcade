//! Turn-processing use case.
//!
//! `Companion` orchestrates one dialogue turn: classify the message,
//! update the session, short-circuit on crisis or grounding, otherwise
//! prompt the generative model and recover a structured reply from
//! whatever it returns. The user always receives a reply; failures
//! degrade to fixed fallbacks instead of surfacing.

use crate::insights::{extract_coping_strategies, extract_themes};
use haven_core::affect::{AffectClassifier, EmotionalState, LexiconClassifier};
use haven_core::config::EngineConfig;
use haven_core::reply::{compose_reply, parse_reply, StructuredReply};
use haven_core::safety::{CrisisPhraseMonitor, RiskAssessment, RiskTier, SafetyAssessor};
use haven_core::session::{Session, SessionState};
use haven_core::Result;
use haven_interaction::{CompletionRequest, GenerativeAgent, PromptBuilder, SamplingParams};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Everything the caller needs from one processed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The machine-readable reply
    pub reply: StructuredReply,
    /// The composed natural-language string for display
    pub display_text: String,
    /// Session state after this turn
    pub state: SessionState,
    /// Safety-monitor verdict, present when the tier is High or above
    pub risk: Option<RiskAssessment>,
}

/// Per-conversation turn orchestrator.
///
/// Holds the classification and safety strategies behind their traits and
/// the generative agent behind `Arc<dyn GenerativeAgent>`. The session is
/// owned by the caller and passed in mutably: one logical caller per
/// session per turn; concurrent turns must be serialized outside.
pub struct Companion {
    agent: Arc<dyn GenerativeAgent>,
    classifier: Box<dyn AffectClassifier>,
    safety: Box<dyn SafetyAssessor>,
    prompts: PromptBuilder,
    config: EngineConfig,
}

impl Companion {
    /// Creates a companion with the default phrase-table strategies.
    pub fn new(agent: Arc<dyn GenerativeAgent>, config: EngineConfig) -> Self {
        Self {
            agent,
            classifier: Box::new(LexiconClassifier::new()),
            safety: Box::new(CrisisPhraseMonitor::new()),
            prompts: PromptBuilder::new(),
            config,
        }
    }

    /// Overrides the classification strategy.
    pub fn with_classifier(mut self, classifier: Box<dyn AffectClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Overrides the safety-assessment strategy.
    pub fn with_safety_assessor(mut self, safety: Box<dyn SafetyAssessor>) -> Self {
        self.safety = safety;
        self
    }

    /// The greeting for a fresh interactive session.
    pub fn welcome(&self) -> String {
        compose_reply(&StructuredReply::welcome())
    }

    /// The farewell for an explicit session close.
    pub fn farewell(&self, session: &mut Session) -> String {
        session.close();
        compose_reply(&StructuredReply::farewell())
    }

    /// Processes one user turn against `session`.
    ///
    /// Infallible by contract: any internal failure is mapped to an
    /// apologetic fallback reply rather than propagated.
    pub async fn process_turn(&self, session: &mut Session, input: &str) -> TurnOutcome {
        match self.run_turn(session, input).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "turn processing failed, returning apology");
                let reply = StructuredReply::apology();
                TurnOutcome {
                    display_text: compose_reply(&reply),
                    reply,
                    state: session.state,
                    risk: None,
                }
            }
        }
    }

    async fn run_turn(&self, session: &mut Session, input: &str) -> Result<TurnOutcome> {
        // Empty input is prompted for, not treated as an error.
        if input.trim().is_empty() {
            let reply = StructuredReply::prompt_for_input();
            return Ok(TurnOutcome {
                display_text: compose_reply(&reply),
                reply,
                state: session.state,
                risk: None,
            });
        }

        let emotional_state = self.classifier.classify(input);
        let assessment = self.safety.assess(input);
        debug!(
            emotion = %emotional_state.primary_emotion,
            intensity = emotional_state.intensity,
            risk = emotional_state.risk_level,
            tier = %assessment.tier,
            "message analyzed"
        );

        session.record_user_message(input, emotional_state.clone());
        let state = session.refresh_state();

        // Crisis short-circuit: the model is bypassed entirely.
        if state == SessionState::Crisis || assessment.tier == RiskTier::Severe {
            info!(session_id = %session.id, "crisis short-circuit engaged");
            let reply = StructuredReply::crisis(&assessment);
            return Ok(self.finish_turn(session, reply, assessment));
        }

        // One-shot grounding offer for high-intensity episodes.
        if session.needs_grounding_exercise() {
            info!(session_id = %session.id, "offering grounding exercise");
            session.mark_grounding_offered();
            let reply = StructuredReply::grounding();
            return Ok(self.finish_turn(session, reply, assessment));
        }

        let reply = self
            .generate_reply(session, input, &emotional_state, state)
            .await?;

        Ok(self.finish_turn(session, reply, assessment))
    }

    async fn generate_reply(
        &self,
        session: &Session,
        input: &str,
        emotional_state: &EmotionalState,
        state: SessionState,
    ) -> Result<StructuredReply> {
        let user_prompt = self.prompts.turn_prompt(input, emotional_state, session)?;
        let params = SamplingParams::select(state, emotional_state, &self.config);

        let request = CompletionRequest {
            system_prompt: self.prompts.system_prompt().to_string(),
            user_prompt,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let reply = match self.agent.complete(request).await {
            Ok(raw) => parse_reply(&raw),
            Err(err) => {
                // Transport failures degrade to the fixed fallback reply.
                warn!(error = %err, "completion failed, using fallback reply");
                StructuredReply::fallback()
            }
        };

        // A mid-conversation greeting means the model lost the thread.
        if state == SessionState::Active && reply.reflection.to_lowercase().contains("welcome") {
            debug!("model greeted mid-conversation, substituting corrective reply");
            return Ok(StructuredReply::regrounded_in_conversation(
                emotional_state.primary_emotion,
            ));
        }

        Ok(reply)
    }

    fn finish_turn(
        &self,
        session: &mut Session,
        reply: StructuredReply,
        assessment: RiskAssessment,
    ) -> TurnOutcome {
        session.note_themes(extract_themes(&reply.reflection));
        session.note_coping_strategies(extract_coping_strategies(&reply.support));

        let display_text = compose_reply(&reply);
        session.record_assistant_message(&display_text);

        TurnOutcome {
            display_text,
            reply,
            state: session.state,
            risk: assessment.is_elevated().then_some(assessment),
        }
    }
}
