//! Persona-voiced message generation: chat replies and proactive check-ins.

pub mod engine;
pub mod prompts;

pub use engine::{CompanionConfig, CompanionEngine};
