//! Store URI parsing.
//!
//! Two forms are accepted: `sqlite::memory:` (or bare `:memory:`) and
//! `sqlite://<directory>`. Each named database lives in its own file under the
//! directory.

use super::{DbError, DbResult};
use std::path::{Path, PathBuf};

const SQLITE_SCHEME: &str = "sqlite://";
const MEMORY_URIS: [&str; 2] = ["sqlite::memory:", ":memory:"];
const DATABASE_FILE_EXTENSION: &str = "sqlite3";

/// Parsed location of a document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUri {
    /// Private in-memory database, discarded on drop.
    Memory,
    /// Directory holding one SQLite file per database name.
    Directory(PathBuf),
}

impl StoreUri {
    /// Parses a store URI.
    ///
    /// # Errors
    /// - Returns `DbError::InvalidUri` for unknown schemes or an empty directory.
    pub fn parse(uri: &str) -> DbResult<Self> {
        let trimmed = uri.trim();
        if MEMORY_URIS.contains(&trimmed) {
            return Ok(Self::Memory);
        }

        match trimmed.strip_prefix(SQLITE_SCHEME) {
            Some(dir) if !dir.trim().is_empty() => {
                Ok(Self::Directory(PathBuf::from(dir.trim_end_matches('/'))))
            }
            _ => Err(DbError::InvalidUri(trimmed.to_string())),
        }
    }

    /// Returns the database file path for `database_name`, or `None` in memory.
    pub fn database_path(&self, database_name: &str) -> Option<PathBuf> {
        match self {
            Self::Memory => None,
            Self::Directory(dir) => Some(database_file(dir, database_name)),
        }
    }

    /// Returns the mode label used in log events.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Directory(_) => "file",
        }
    }
}

fn database_file(dir: &Path, database_name: &str) -> PathBuf {
    dir.join(format!("{database_name}.{DATABASE_FILE_EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::StoreUri;
    use crate::db::DbError;
    use std::path::PathBuf;

    #[test]
    fn parse_accepts_memory_forms() {
        assert_eq!(StoreUri::parse("sqlite::memory:").unwrap(), StoreUri::Memory);
        assert_eq!(StoreUri::parse(" :memory: ").unwrap(), StoreUri::Memory);
    }

    #[test]
    fn parse_directory_and_derive_database_file() {
        let uri = StoreUri::parse("sqlite://data/notes/").unwrap();
        assert_eq!(uri, StoreUri::Directory(PathBuf::from("data/notes")));
        assert_eq!(
            uri.database_path("active_reading_assistant"),
            Some(PathBuf::from("data/notes/active_reading_assistant.sqlite3"))
        );
    }

    #[test]
    fn parse_rejects_foreign_schemes() {
        let err = StoreUri::parse("mongodb://localhost:27017/").unwrap_err();
        assert!(matches!(err, DbError::InvalidUri(_)));
        assert!(matches!(
            StoreUri::parse("sqlite://").unwrap_err(),
            DbError::InvalidUri(_)
        ));
    }
}
