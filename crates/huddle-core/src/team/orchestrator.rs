//! Session orchestrator.
//!
//! Round one asks every role, in priority order, for its contribution. Round
//! two asks the Team Leader to synthesize and the Engineer for a detailed
//! plan. Every call sees the full transcript produced before it and nothing
//! after, so calls run strictly one at a time.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use super::invoker::{Invocation, ModelInvoker};
use super::roles::{RoleId, RoleProfile, RoleRegistry};
use super::transcript::{Category, Transcript};
use crate::constants::session::{
    DETAIL_DIRECTIVE, SESSION_FAILURE_MESSAGE, SYNTHESIS_DIRECTIVE, SYSTEM_AGENT,
};
use crate::error::HuddleError;
use crate::llm::LlmClient;
use crate::stream::{EventEmitter, EventSink};

/// Where a session is in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Next round-one role to invoke, as an index into the registry order
    Round1Pending(usize),
    Round2Synthesis,
    Round2Detail,
    Done,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Done | SessionState::Failed)
    }
}

/// Summary of a finished session.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub session_id: Uuid,
    /// `Done` or `Failed`.
    pub final_state: SessionState,
    pub transcript: Transcript,
    pub invocations: usize,
    pub fallbacks: usize,
    /// The consumer went away and the remaining invocations were skipped.
    pub detached: bool,
}

impl SessionReport {
    pub fn succeeded(&self) -> bool {
        self.final_state == SessionState::Done && !self.detached
    }
}

/// Drives one request through both rounds. Cheap to clone and share; each
/// call to [`run`](Self::run) is an independent session.
#[derive(Clone)]
pub struct SessionOrchestrator {
    registry: Arc<RoleRegistry>,
    invoker: ModelInvoker,
}

impl SessionOrchestrator {
    pub fn new(registry: Arc<RoleRegistry>, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            registry,
            invoker: ModelInvoker::new(llm),
        }
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// Run a full session, streaming every message into `sink`.
    ///
    /// Never fails: errors outside the model calls end the session with one
    /// system message. The sink is closed exactly once before returning.
    pub async fn run<S: EventSink>(&self, request: &str, sink: S) -> SessionReport {
        let session_id = Uuid::new_v4();
        let span = tracing::info_span!("session", id = %session_id);

        async move {
            tracing::info!(roles = self.registry.len(), "Session started");
            let mut session = Session::new(request, sink);
            let mut state = SessionState::Round1Pending(0);

            while !state.is_terminal() {
                state = match self.step(&mut session, state).await {
                    Ok(next) => next,
                    Err(e) => {
                        tracing::error!("Session failed in {:?}: {}", state, e);
                        session.report_failure();
                        SessionState::Failed
                    }
                };
            }

            session.emitter.close();
            tracing::info!(
                state = ?state,
                messages = session.transcript.len(),
                fallbacks = session.fallbacks,
                detached = session.detached,
                "Session finished"
            );

            SessionReport {
                session_id,
                final_state: state,
                transcript: session.transcript,
                invocations: session.invocations,
                fallbacks: session.fallbacks,
                detached: session.detached,
            }
        }
        .instrument(span)
        .await
    }

    async fn step<S: EventSink>(
        &self,
        session: &mut Session<S>,
        state: SessionState,
    ) -> Result<SessionState, HuddleError> {
        match state {
            SessionState::Round1Pending(k) => {
                let Some(role) = self.registry.list_roles().get(k) else {
                    return Ok(SessionState::Round2Synthesis);
                };
                if session.abandoned() {
                    return Ok(SessionState::Done);
                }
                let category = round_one_category(k, role.id);
                self.contribute(session, role, &role.instructions, category)
                    .await?;
                Ok(SessionState::Round1Pending(k + 1))
            }
            SessionState::Round2Synthesis => {
                let role = self.registry.synthesis_role()?;
                if session.abandoned() {
                    return Ok(SessionState::Done);
                }
                let instructions = format!("{}\n\n{}", role.instructions, SYNTHESIS_DIRECTIVE);
                self.contribute(session, role, &instructions, Some(Category::Review))
                    .await?;
                Ok(SessionState::Round2Detail)
            }
            SessionState::Round2Detail => {
                let role = self.registry.detail_role()?;
                if session.abandoned() {
                    return Ok(SessionState::Done);
                }
                let instructions = format!("{}\n\n{}", role.instructions, DETAIL_DIRECTIVE);
                self.contribute(
                    session,
                    role,
                    &instructions,
                    Some(Category::Implementation),
                )
                .await?;
                Ok(SessionState::Done)
            }
            SessionState::Done | SessionState::Failed => Ok(state),
        }
    }

    /// Invoke one role against the current transcript, record and emit it.
    async fn contribute<S: EventSink>(
        &self,
        session: &mut Session<S>,
        role: &RoleProfile,
        instructions: &str,
        category: Option<Category>,
    ) -> Result<(), HuddleError> {
        tracing::debug!(role = %role.name, "Invoking role");
        let context = session.transcript.render();
        let outcome = self
            .invoker
            .invoke(instructions, &session.request, &context)
            .await;
        session.record(&role.name, outcome, category)
    }
}

/// First role by priority opens with analysis; the Architect plans; the
/// Engineer implements. Everyone else is untagged.
pub fn round_one_category(position: usize, role: RoleId) -> Option<Category> {
    if position == 0 {
        return Some(Category::Analysis);
    }
    match role {
        RoleId::Architect => Some(Category::Plan),
        RoleId::Engineer => Some(Category::Implementation),
        _ => None,
    }
}

/// Per-request state. Owned by exactly one `run` call.
struct Session<S: EventSink> {
    request: String,
    transcript: Transcript,
    emitter: EventEmitter<S>,
    invocations: usize,
    fallbacks: usize,
    detached: bool,
}

impl<S: EventSink> Session<S> {
    fn new(request: &str, sink: S) -> Self {
        Self {
            request: request.to_string(),
            transcript: Transcript::new(),
            emitter: EventEmitter::new(sink),
            invocations: 0,
            fallbacks: 0,
            detached: false,
        }
    }

    /// Checked before every model call so a departed consumer does not keep
    /// paying for invocations.
    fn abandoned(&mut self) -> bool {
        if !self.emitter.is_live() {
            if !self.detached {
                tracing::info!("Consumer detached; skipping remaining invocations");
            }
            self.detached = true;
        }
        self.detached
    }

    fn record(
        &mut self,
        agent: &str,
        outcome: Invocation,
        category: Option<Category>,
    ) -> Result<(), HuddleError> {
        self.invocations += 1;
        if outcome.is_fallback() {
            self.fallbacks += 1;
        }
        let message = self.transcript.append(agent, outcome.into_text(), category);
        self.emitter.emit(message)
    }

    fn report_failure(&mut self) {
        let message = self
            .transcript
            .append(SYSTEM_AGENT, SESSION_FAILURE_MESSAGE, None);
        if let Err(e) = self.emitter.emit(message) {
            tracing::error!("Could not emit failure notice: {}", e);
        }
    }
}
