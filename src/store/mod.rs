//! Persistence layer: libSQL-backed storage for personas, tests,
//! conversations and SNS monitoring.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{
    ConversationEntry, Database, EntryKind, EntryRole, MonitoredPost, NewSnsIntegration,
    Platform, SnsIntegration, StoredTestResult,
};
