//! Conversation controller
//!
//! Drives one request/response turn against a session's provisioned agent.
//! The transcript only ever records completed exchanges: both turns of an
//! exchange are appended after the remote call succeeds, or neither is.

use std::sync::Arc;

use crate::core::{AssistantError, AssistantResult};
use crate::session::{Session, Speaker};

use crate::assistant::AssistantClient;

/// Forwards user utterances to the provisioned agent and keeps the
/// transcript consistent even on failure
pub struct ConversationController {
    client: Arc<dyn AssistantClient>,
}

impl ConversationController {
    pub fn new(client: Arc<dyn AssistantClient>) -> Self {
        Self { client }
    }

    /// Submit one user utterance and return the agent's reply text
    ///
    /// Fails with `NotProvisioned` before any remote call if the session has
    /// no agent. On a failed round trip the transcript is left untouched, so
    /// a dangling user message can never appear without its reply.
    pub async fn submit(&self, session: &mut Session, utterance: &str) -> AssistantResult<String> {
        let handle = match session.agent() {
            Some(handle) => handle.clone(),
            None => return Err(AssistantError::NotProvisioned),
        };

        tracing::info!("Submitting utterance for session {}", session.id());

        let reply = self
            .client
            .chat(handle.credential(), handle.binding(), utterance)
            .await
            .map_err(|e| AssistantError::communication(format!("{:#}", e)))?;

        // Normalize structured replies to plain text before touching the
        // transcript; a reply without a textual payload is a failed exchange.
        let text = reply
            .into_text()
            .map_err(|e| AssistantError::communication(format!("{:#}", e)))?;

        session.append_turn(Speaker::User, utterance);
        session.append_turn(Speaker::Agent, text.as_str());

        tracing::debug!(
            "Exchange complete for session {}, transcript now {} turns",
            session.id(),
            session.transcript().len()
        );

        Ok(text)
    }
}
