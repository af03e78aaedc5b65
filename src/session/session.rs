//! Per-user session state
//!
//! A `Session` moves through exactly one state transition:
//! `Unprovisioned -> Provisioned`. The transition is performed by the
//! provisioner and is terminal; the agent handle is never replaced or rebound
//! within the same session.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::assistant::AgentHandle;

use super::transcript::{Speaker, Transcript, Turn};

/// Opaque session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random session id
    pub fn generate() -> Self {
        SessionId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        SessionId(id.to_string())
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        SessionId(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user's continuous interaction context
///
/// Owns the transcript and, once provisioned, the agent handle. Not persisted
/// beyond its lifetime.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    transcript: Transcript,
    agent: Option<AgentHandle>,
    knowledge_source: Option<PathBuf>,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session: no turns, no agent, no knowledge file
    pub fn new(id: SessionId) -> Self {
        tracing::info!("Creating session {}", id);
        Self {
            id,
            transcript: Transcript::new(),
            agent: None,
            knowledge_source: None,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The provisioned agent, if any
    pub fn agent(&self) -> Option<&AgentHandle> {
        self.agent.as_ref()
    }

    /// Whether the session has reached its terminal `Provisioned` state
    pub fn is_provisioned(&self) -> bool {
        self.agent.is_some()
    }

    /// The knowledge-source file the agent was bound to, if provisioned
    pub fn knowledge_source(&self) -> Option<&Path> {
        self.knowledge_source.as_deref()
    }

    /// Install the agent handle, transitioning to `Provisioned`
    ///
    /// If an agent is already installed the call is a no-op and the existing
    /// handle is kept: the first binding wins for the session's lifetime.
    /// Returns the handle that is installed after the call.
    pub(crate) fn install_agent(
        &mut self,
        handle: AgentHandle,
        knowledge_source: PathBuf,
    ) -> &AgentHandle {
        if self.agent.is_some() {
            tracing::warn!(
                "Session {} already provisioned, keeping existing agent",
                self.id
            );
        } else {
            tracing::info!("Session {} provisioned", self.id);
            self.knowledge_source = Some(knowledge_source);
        }
        self.agent.get_or_insert(handle)
    }

    /// Append a turn to the transcript
    pub fn append_turn(&mut self, speaker: Speaker, text: impl Into<String>) -> &Turn {
        self.transcript.append(speaker, text)
    }

    /// The conversation transcript
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Render the transcript for export (`conversation.txt`)
    pub fn export_transcript(&self) -> String {
        self.transcript.export()
    }
}
