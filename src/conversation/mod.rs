//! Conversation flow
//!
//! - `ConversationController` - One request/response turn against a session's agent
//! - `ConversationManager` - Session-keyed facade over store, provisioner and controller

pub mod controller;
pub mod manager;

pub use controller::ConversationController;
pub use manager::ConversationManager;
