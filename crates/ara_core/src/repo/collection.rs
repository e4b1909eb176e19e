//! Named document collections stored as JSON rows.
//!
//! # Responsibility
//! - Key/value document access scoped to one collection name.
//! - Preserve insertion order for listings.
//!
//! # Invariants
//! - `(collection, doc_key)` is unique.
//! - Bodies are always valid JSON written by `serde_json`.

use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

/// Collection holding one document per username.
pub const USERS_COLLECTION: &str = "users";

/// Handle over one named collection.
///
/// Borrowing a `Transaction` works too, since it derefs to `Connection`.
pub struct Collection<'conn> {
    conn: &'conn Connection,
    name: String,
}

impl<'conn> Collection<'conn> {
    pub fn new(conn: &'conn Connection, name: impl Into<String>) -> Self {
        Self {
            conn,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the document stored under `key`.
    pub fn find_one(&self, key: &str) -> RepoResult<Option<Value>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND doc_key = ?2;",
                params![self.name, key],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(text) => serde_json::from_str(&text).map(Some).map_err(|err| {
                RepoError::InvalidData(format!(
                    "document `{key}` in `{}` is not valid JSON: {err}",
                    self.name
                ))
            }),
            None => Ok(None),
        }
    }

    /// Inserts a new document under `key`.
    ///
    /// # Errors
    /// - `RepoError::DuplicateKey` when `key` is already present.
    pub fn insert_one(&self, key: &str, document: &Value) -> RepoResult<()> {
        let body = serde_json::to_string(document)?;
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO documents (collection, doc_key, body, seq)
             SELECT ?1, ?2, ?3, COALESCE(MAX(seq), 0) + 1
             FROM documents
             WHERE collection = ?1;",
            params![self.name, key, body],
        )?;

        if changed == 0 {
            return Err(RepoError::DuplicateKey {
                collection: self.name.clone(),
                key: key.to_string(),
            });
        }
        Ok(())
    }

    /// Replaces the document under `key`. Returns `false` when absent.
    pub fn replace_one(&self, key: &str, document: &Value) -> RepoResult<bool> {
        let body = serde_json::to_string(document)?;
        let changed = self.conn.execute(
            "UPDATE documents
             SET
                body = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE collection = ?1 AND doc_key = ?2;",
            params![self.name, key, body],
        )?;
        Ok(changed > 0)
    }

    /// Deletes the document under `key`. Returns `false` when absent.
    pub fn delete_one(&self, key: &str) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND doc_key = ?2;",
            params![self.name, key],
        )?;
        Ok(changed > 0)
    }

    /// Lists document keys in insertion order.
    pub fn list_keys(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT doc_key FROM documents WHERE collection = ?1 ORDER BY seq ASC, doc_key ASC;",
        )?;
        let mut rows = stmt.query([self.name.as_str()])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }

    pub fn count(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1;",
            [self.name.as_str()],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

/// Fails unless the `documents` table exists on `conn`.
pub fn ensure_documents_table(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'documents'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::MissingRequiredTable("documents"))
    }
}
