//! Session-keyed conversation manager
//!
//! Facade that ties the session store, provisioner and controller together.
//! Every operation locks its session for the duration of the call, which is
//! what gives the crate its concurrency guarantees: concurrent provisions on
//! one session collapse to a single remote call (first caller wins), and
//! concurrent submits serialize so transcript ordinals stay in order. Other
//! sessions are never blocked.

use std::path::Path;
use std::sync::Arc;

use crate::assistant::{
    AgentHandle, AgentProvisioner, AssistantClient, AssistantProfile,
};
use crate::core::{AssistantResult, Credential};
use crate::session::{SessionId, SessionStore};

use super::controller::ConversationController;

/// Entry point for hosting interactive sessions
#[derive(Clone)]
pub struct ConversationManager {
    store: SessionStore,
    provisioner: Arc<AgentProvisioner>,
    controller: Arc<ConversationController>,
}

impl ConversationManager {
    /// Create a manager with the fixed Tax Provider profile
    pub fn new(client: Arc<dyn AssistantClient>) -> Self {
        Self {
            store: SessionStore::new(),
            provisioner: Arc::new(AgentProvisioner::new(Arc::clone(&client))),
            controller: Arc::new(ConversationController::new(client)),
        }
    }

    /// Create a manager with a custom assistant profile
    pub fn with_profile(client: Arc<dyn AssistantClient>, profile: AssistantProfile) -> Self {
        Self {
            store: SessionStore::new(),
            provisioner: Arc::new(AgentProvisioner::with_profile(Arc::clone(&client), profile)),
            controller: Arc::new(ConversationController::new(client)),
        }
    }

    /// The underlying session store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Provision the agent for `session_id`, creating the session if needed
    ///
    /// See [`AgentProvisioner::provision`] for the at-most-once guarantee.
    pub async fn provision(
        &self,
        session_id: &SessionId,
        credential: &Credential,
        file_path: &Path,
    ) -> AssistantResult<AgentHandle> {
        let session = self.store.get_or_create(session_id).await;
        let mut session = session.lock().await;
        self.provisioner
            .provision(&mut session, credential, file_path)
            .await
    }

    /// Submit one utterance on `session_id` and return the agent's reply
    pub async fn submit(&self, session_id: &SessionId, utterance: &str) -> AssistantResult<String> {
        let session = self.store.get_or_create(session_id).await;
        let mut session = session.lock().await;
        self.controller.submit(&mut session, utterance).await
    }

    /// Whether the session has a provisioned agent
    pub async fn is_provisioned(&self, session_id: &SessionId) -> bool {
        match self.store.get(session_id).await {
            Some(session) => session.lock().await.is_provisioned(),
            None => false,
        }
    }

    /// Render the session's transcript for export
    pub async fn export_transcript(&self, session_id: &SessionId) -> String {
        match self.store.get(session_id).await {
            Some(session) => session.lock().await.export_transcript(),
            None => String::new(),
        }
    }
}
