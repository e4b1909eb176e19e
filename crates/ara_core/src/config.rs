//! Store configuration and defaults.
//!
//! Defaults are fixed constants; callers (the CLI) override them explicitly.
//! Nothing is read from the environment.

use std::path::PathBuf;

/// Default store location: a `ara-data` directory next to the working dir.
pub const DEFAULT_STORE_URI: &str = "sqlite://ara-data";
/// Default database name inside the store.
pub const DEFAULT_DATABASE_NAME: &str = "active_reading_assistant";

/// Connection settings for `Store::connect_with`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub uri: String,
    pub database_name: String,
    /// Schema description override. `None` uses the bundled schema.
    pub schema_path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn new(uri: impl Into<String>, database_name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database_name: database_name.into(),
            schema_path: None,
        }
    }

    /// In-memory store, used by tests and throwaway sessions.
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:", DEFAULT_DATABASE_NAME)
    }

    pub fn with_schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_path = Some(path.into());
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_URI, DEFAULT_DATABASE_NAME)
    }
}
