pub mod core;
pub mod session;
pub mod assistant;
pub mod conversation;

// Optional components
pub mod cli;
pub mod logging;
