//! Assistant service trait
//!
//! Abstracts the hosted assistants API so the provisioner and controller can
//! be exercised against scripted implementations in tests, and so a different
//! hosting backend can be swapped in without touching session logic.

use anyhow::{anyhow, Result};
use std::path::Path;

use crate::core::Credential;

use super::handle::AgentBinding;
use super::profile::AssistantProfile;

/// A reply from the remote agent's chat endpoint
///
/// The service may answer with plain text or with a structured payload that
/// carries the text in a field; normalizing to a plain string is the
/// caller's job via [`ChatReply::into_text`].
#[derive(Debug, Clone)]
pub enum ChatReply {
    /// Plain text response
    Text(String),
    /// Structured response object with a textual payload inside
    Structured(serde_json::Value),
}

impl ChatReply {
    /// Extract the textual payload
    ///
    /// Structured payloads are expected to carry the text under `response`
    /// or `text`; anything else is a malformed response.
    pub fn into_text(self) -> Result<String> {
        match self {
            ChatReply::Text(text) => Ok(text),
            ChatReply::Structured(value) => value
                .get("response")
                .or_else(|| value.get("text"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .ok_or_else(|| anyhow!("structured reply has no textual payload: {}", value)),
        }
    }
}

/// Trait for hosted assistant services
///
/// Both operations may suspend on network round trips; implementations must
/// bound them with a timeout rather than hang indefinitely.
#[async_trait::async_trait]
pub trait AssistantClient: Send + Sync {
    /// Create a remote agent bound to the given knowledge-source file
    ///
    /// The binding is permanent: the file becomes the agent's exclusive
    /// knowledge source for its whole lifetime.
    async fn create_agent(
        &self,
        credential: &Credential,
        profile: &AssistantProfile,
        knowledge_file: &Path,
    ) -> Result<AgentBinding>;

    /// Send one user utterance and wait for the agent's reply
    async fn chat(
        &self,
        credential: &Credential,
        binding: &AgentBinding,
        text: &str,
    ) -> Result<ChatReply>;
}
