//! Agent provisioning
//!
//! Produces exactly one agent per session, bound to the first successfully
//! uploaded knowledge-source file. Later calls return the existing handle
//! unchanged, whatever arguments they carry.

use std::path::Path;
use std::sync::Arc;

use crate::core::{AssistantError, AssistantResult, Credential};
use crate::session::Session;

use super::handle::AgentHandle;
use super::profile::AssistantProfile;
use super::provider::AssistantClient;

/// Provisions remote agents for sessions
///
/// Holds the service client and the fixed instruction template. The caller is
/// expected to hold the session's lock for the duration of the call, which
/// makes concurrent provision attempts collapse to a single remote call.
pub struct AgentProvisioner {
    client: Arc<dyn AssistantClient>,
    profile: AssistantProfile,
}

impl AgentProvisioner {
    /// Create a provisioner with the fixed Tax Provider profile
    pub fn new(client: Arc<dyn AssistantClient>) -> Self {
        Self {
            client,
            profile: AssistantProfile::tax_provider(),
        }
    }

    /// Create a provisioner with a custom profile
    pub fn with_profile(client: Arc<dyn AssistantClient>, profile: AssistantProfile) -> Self {
        Self { client, profile }
    }

    /// The instruction template agents are provisioned with
    pub fn profile(&self) -> &AssistantProfile {
        &self.profile
    }

    /// Provision the session's agent, or return the existing handle
    ///
    /// Idempotent by session, not by arguments: once a session is
    /// provisioned, a different credential or file path on a later call is
    /// ignored and the original binding is preserved.
    ///
    /// On failure the session's agent stays unset, so a retry with corrected
    /// inputs can succeed.
    pub async fn provision(
        &self,
        session: &mut Session,
        credential: &Credential,
        file_path: &Path,
    ) -> AssistantResult<AgentHandle> {
        if let Some(existing) = session.agent() {
            tracing::debug!(
                "Session {} already has an agent, returning existing handle",
                session.id()
            );
            return Ok(existing.clone());
        }

        if credential.is_empty() {
            return Err(AssistantError::provisioning("credential must not be empty"));
        }

        // Catch unreadable files before spending a remote round trip
        tokio::fs::metadata(file_path).await.map_err(|e| {
            AssistantError::provisioning(format!(
                "knowledge source {:?} is not readable: {}",
                file_path, e
            ))
        })?;

        tracing::info!(
            "Provisioning agent for session {} with knowledge source {:?}",
            session.id(),
            file_path
        );

        let binding = self
            .client
            .create_agent(credential, &self.profile, file_path)
            .await
            .map_err(|e| AssistantError::provisioning(format!("{:#}", e)))?;

        tracing::info!(
            "Agent {} provisioned for session {}",
            binding.assistant_id,
            session.id()
        );

        let handle = AgentHandle::new(binding, credential.clone());
        Ok(session
            .install_agent(handle, file_path.to_path_buf())
            .clone())
    }
}
