//! Friend AI: personality quiz, persona companions and SNS sentiment watch.

pub mod api;
pub mod companion;
pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
pub mod personality;
pub mod pipeline;
pub mod sentiment;
pub mod store;
