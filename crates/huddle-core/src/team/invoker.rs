use crate::constants::session::{CLOSING_DIRECTIVE, FALLBACK_MESSAGE};
use crate::llm::{LlmClient, Message};
use std::sync::Arc;

/// Outcome of a single model call. Failure is a value, not an error: the
/// session keeps going either way.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Completed(String),
    Fallback { reason: String },
}

impl Invocation {
    /// Body to record in the transcript.
    pub fn text(&self) -> &str {
        match self {
            Invocation::Completed(text) => text,
            Invocation::Fallback { .. } => FALLBACK_MESSAGE,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Invocation::Completed(text) => text,
            Invocation::Fallback { .. } => FALLBACK_MESSAGE.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Invocation::Fallback { .. })
    }
}

/// Wraps an [`LlmClient`] with the team prompt layout and local failure recovery.
#[derive(Clone)]
pub struct ModelInvoker {
    llm: Arc<dyn LlmClient>,
}

impl ModelInvoker {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn invoke(
        &self,
        instructions: &str,
        original_request: &str,
        transcript: &str,
    ) -> Invocation {
        let messages = vec![
            Message::system(instructions),
            Message::user(compose_prompt(original_request, transcript)),
        ];

        match self.llm.chat(&messages).await {
            Ok(response) => Invocation::Completed(response.message.content),
            Err(e) => {
                tracing::warn!("Model invocation failed, using fallback: {}", e);
                Invocation::Fallback {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// The single user turn sent with every invocation.
pub fn compose_prompt(original_request: &str, transcript: &str) -> String {
    format!(
        "{}\n\nOriginal Request: {}\n\n{}",
        transcript, original_request, CLOSING_DIRECTIVE
    )
}
