//! SNS monitoring pipeline.
//!
//! Linked accounts → `PostSource` → dedup against stored analyses →
//! `SentimentAnalyzer::analyze_batch` → persisted `MonitoredPost` →
//! proactive check-in from the user's persona for every triggered post.

pub mod monitor;
pub mod types;

pub use monitor::SnsMonitor;
pub use types::{Alert, CheckReport, DemoPostSource, FetchedPost, PostSource};
