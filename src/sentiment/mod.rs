//! Sentiment gate for monitored social-media posts.
//!
//! 1. `SentimentAnalyzer::classify_primary()`: LLM verdict, parsed from the
//!    first JSON object in the reply
//! 2. `KeywordFallback::classify()`: deterministic keyword heuristic
//!
//! `analyze()` always returns a result; provider failures never escape.

pub mod analyzer;
pub mod fallback;
pub mod parse;
pub mod prompts;
pub mod types;

pub use analyzer::{AnalyzerConfig, PrimaryOutcome, ProviderFailure, SentimentAnalyzer};
pub use fallback::KeywordFallback;
pub use types::{SentimentLabel, SentimentResult, SnsPost};
