//! Session-scoped state
//!
//! One `Session` per interacting user, holding the append-only transcript and
//! the (at most one) provisioned agent handle. The `SessionStore` keeps
//! sessions isolated from one another and serializes access per session.

pub mod knowledge;
pub mod session;
pub mod store;
pub mod transcript;

pub use knowledge::StagedKnowledgeFile;
pub use session::{Session, SessionId};
pub use store::SessionStore;
pub use transcript::{Speaker, Transcript, Turn};
