//! Core domain logic for the Active Reading Assistant.
//! This crate owns note persistence and reading-session state; UIs sit on top.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;
pub mod study;

pub use config::{StoreConfig, DEFAULT_DATABASE_NAME, DEFAULT_STORE_URI};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{NoteDocument, Section, EXAMPLE_CHAPTER_ID, UNTITLED_SECTION};
pub use model::user::{Chapter, NoteEntry, PdfId, UserRecord};
pub use repo::collection::{Collection, USERS_COLLECTION};
pub use repo::user_repo::UpsertOutcome;
pub use repo::{RepoError, RepoResult};
pub use schema::{DocumentSchema, SchemaError, SchemaViolation};
pub use service::store::{NoteLookup, Store, StoreError, StoreResult};
pub use study::catalog::{PdfCatalog, PdfEntry};
pub use study::prompt::{PromptTracker, Sq3rStage};
pub use study::session::ReadingSession;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
