//! Core types shared across the crate
//!
//! - `AssistantError` - Error taxonomy for provisioning and chat
//! - `Credential` - API credential newtype that never prints its value

pub mod credential;
pub mod error;

pub use credential::Credential;
pub use error::{AssistantError, AssistantResult};
