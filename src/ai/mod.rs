//! Help agent backed by the Gemini API

pub mod client;
pub mod help_agent;
pub mod prompt;

// Re-export main types for convenience
pub use client::{ChatModel, ChatReply, GeminiClient};
pub use help_agent::HelpAgent;
