//! Prompt domain
//!
//! Templates for the system prompt and user turn of each deliberation phase.

mod template;

pub use template::DeliberationPrompt;
