//! Remote assistant integration
//!
//! - `AssistantClient` - Trait seam over the hosted assistants service
//! - `OpenAiAssistantClient` - Production HTTP implementation
//! - `AgentProvisioner` - At-most-once agent creation per session
//! - `AssistantProfile` - Static instruction template for the Tax Provider

pub mod handle;
pub mod openai;
pub mod profile;
pub mod provider;
pub mod provisioner;

pub use handle::{AgentBinding, AgentHandle};
pub use openai::OpenAiAssistantClient;
pub use profile::AssistantProfile;
pub use provider::{AssistantClient, ChatReply};
pub use provisioner::AgentProvisioner;
