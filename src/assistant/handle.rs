//! Agent handle types
//!
//! An `AgentHandle` is the session-side reference to a remote, stateful
//! conversational resource. It is bound permanently to one knowledge-source
//! file at creation time and is never rebound within a session.

use serde::{Deserialize, Serialize};

use crate::core::Credential;

/// Opaque remote identifiers for a provisioned agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentBinding {
    /// Remote assistant resource id
    pub assistant_id: String,
    /// Conversation thread the agent replies on
    pub thread_id: String,
    /// Remote id of the uploaded knowledge-source file
    pub knowledge_file_id: String,
}

/// Session-side handle to a provisioned remote agent
///
/// Carries the credential it was provisioned with so chat round trips can
/// authenticate without re-supplying it. The credential is redacted from
/// `Debug` output.
#[derive(Debug, Clone)]
pub struct AgentHandle {
    binding: AgentBinding,
    credential: Credential,
}

impl AgentHandle {
    pub fn new(binding: AgentBinding, credential: Credential) -> Self {
        Self {
            binding,
            credential,
        }
    }

    pub fn binding(&self) -> &AgentBinding {
        &self.binding
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}
