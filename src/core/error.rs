//! Error types for the assistant session manager

use thiserror::Error;

/// Errors that can occur while provisioning or talking to the remote agent
///
/// Every variant is recoverable: the session stays usable and the caller may
/// retry with corrected inputs.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Provisioning the remote agent failed (bad credential, unreadable file,
    /// or a failed remote call). The session's agent remains unset.
    #[error("provisioning failed: {reason}")]
    Provisioning {
        /// Human-readable description of what went wrong
        reason: String,
    },

    /// `submit` was called before a successful `provision`
    #[error("no agent has been provisioned for this session")]
    NotProvisioned,

    /// A chat round trip failed after provisioning. The transcript is left
    /// exactly as it was before the call.
    #[error("agent communication failed: {reason}")]
    AgentCommunication {
        /// Human-readable description of what went wrong
        reason: String,
    },
}

impl AssistantError {
    /// Create a provisioning error from any displayable cause
    pub fn provisioning(cause: impl std::fmt::Display) -> Self {
        AssistantError::Provisioning {
            reason: format!("{:#}", cause),
        }
    }

    /// Create a communication error from any displayable cause
    pub fn communication(cause: impl std::fmt::Display) -> Self {
        AssistantError::AgentCommunication {
            reason: format!("{:#}", cause),
        }
    }

    /// Check whether this error means the caller must provision first
    pub fn is_not_provisioned(&self) -> bool {
        matches!(self, AssistantError::NotProvisioned)
    }
}

/// Result type alias for session manager operations
pub type AssistantResult<T> = Result<T, AssistantError>;
