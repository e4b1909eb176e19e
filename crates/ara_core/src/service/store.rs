//! Note store use-case service.
//!
//! # Responsibility
//! - Own the document-store connection and its observable `connected` flag.
//! - Translate `NoteDocument` edits into user-document mutations and back.
//!
//! # Invariants
//! - Connect never fails loudly: errors are logged and leave the store
//!   disconnected. Every later call then returns `StoreError::NotConnected`.
//! - `save_notes` is last-writer-wins; an existing entry's sections are fully
//!   replaced, never merged.
//! - Malformed stored entries are reported, never partially returned, and never
//!   rewritten by reads.

use crate::config::StoreConfig;
use crate::db::{list_databases, open_uri, DbResult, StoreUri};
use crate::model::note::NoteDocument;
use crate::model::user::{entry_matches, pdf_id_text, NoteEntry, PdfId};
use crate::repo::collection::{Collection, USERS_COLLECTION};
use crate::repo::user_repo::{find_user, SqliteUserRepository, UpsertOutcome, UserRepository};
use crate::repo::RepoError;
use crate::schema::{DocumentSchema, SchemaViolation};
use log::{error, info, warn};
use rusqlite::Connection;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Service error for store use-cases.
#[derive(Debug)]
pub enum StoreError {
    /// The connect step failed; nothing can be read or persisted.
    NotConnected,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected to the note store"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotConnected => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Result of looking up one `(username, pdf_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteLookup {
    Found(NoteDocument),
    UserNotFound,
    NoNotesForPdf,
    /// The matching entry is missing an expected field or has the wrong shape.
    Malformed { reason: String },
}

impl NoteLookup {
    pub fn into_document(self) -> Option<NoteDocument> {
        match self {
            Self::Found(document) => Some(document),
            _ => None,
        }
    }

    fn status(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::UserNotFound => "user_not_found",
            Self::NoNotesForPdf => "no_notes_for_pdf",
            Self::Malformed { .. } => "malformed",
        }
    }
}

/// Handle over the note document store.
pub struct Store {
    conn: Option<Connection>,
    database_name: String,
    schema: DocumentSchema,
}

impl Store {
    /// Connects to `database_name` at `uri` with the bundled schema.
    ///
    /// Check `is_connected` before relying on persistence.
    pub fn connect(uri: &str, database_name: &str) -> Self {
        Self::connect_with(&StoreConfig::new(uri, database_name))
    }

    /// Connects using a full configuration.
    ///
    /// # Side effects
    /// - Reads the schema description file, when configured.
    /// - Emits `store_connect` events; failures are logged, not returned.
    pub fn connect_with(config: &StoreConfig) -> Self {
        let started_at = Instant::now();
        let schema = DocumentSchema::load_or_bundled(config.schema_path.as_deref());

        let conn = match open_and_probe(config) {
            Ok((conn, databases)) => {
                info!(
                    "event=store_connect module=store status=ok database={} attached={} duration_ms={}",
                    config.database_name,
                    databases,
                    started_at.elapsed().as_millis()
                );
                Some(conn)
            }
            Err(err) => {
                error!(
                    "event=store_connect module=store status=error database={} duration_ms={} error={}",
                    config.database_name,
                    started_at.elapsed().as_millis(),
                    err
                );
                None
            }
        };

        Self {
            conn,
            database_name: config.database_name.clone(),
            schema,
        }
    }

    /// Whether the connect-time round trip succeeded.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn schema(&self) -> &DocumentSchema {
        &self.schema
    }

    /// Returns raw document access for the named collection.
    pub fn collection(&self, name: &str) -> StoreResult<Collection<'_>> {
        Ok(Collection::new(self.conn()?, name))
    }

    /// Looks up the notes for `(username, pdf_id)` with a typed outcome.
    pub fn lookup_notes(&self, username: &str, pdf_id: &str) -> StoreResult<NoteLookup> {
        let lookup = match find_user(self.conn()?, username)? {
            None => NoteLookup::UserNotFound,
            Some(document) => lookup_in_document(&document, pdf_id),
        };

        match &lookup {
            NoteLookup::Found(document) => info!(
                "event=notes_fetch module=store status=found pdf_id={} sections={}",
                pdf_id,
                document.sections.len()
            ),
            NoteLookup::Malformed { reason } => warn!(
                "event=notes_fetch module=store status=malformed pdf_id={} reason={}",
                pdf_id, reason
            ),
            other => info!(
                "event=notes_fetch module=store status={} pdf_id={}",
                other.status(),
                pdf_id
            ),
        }
        Ok(lookup)
    }

    /// Fetches the notes for `(username, pdf_id)`.
    ///
    /// Unknown users, PDFs without notes and malformed entries all yield
    /// `Ok(None)`; the reason is logged. Use `lookup_notes` to inspect it.
    pub fn fetch_notes(&self, username: &str, pdf_id: &str) -> StoreResult<Option<NoteDocument>> {
        Ok(self.lookup_notes(username, pdf_id)?.into_document())
    }

    /// Persists `document` as the authoritative notes for its PDF.
    ///
    /// Creates the user, appends a new entry, or overwrites the existing
    /// entry's chapter title and full section list, in one transaction.
    pub fn save_notes(
        &mut self,
        username: &str,
        document: &NoteDocument,
    ) -> StoreResult<UpsertOutcome> {
        let entry: NoteEntry = document.to_entry();
        let mut repo = SqliteUserRepository::try_new(self.conn_mut()?)?;
        let outcome = repo.upsert_note_entry(username, &entry)?;
        info!(
            "event=notes_save module=store status=ok outcome={} pdf_id={} sections={}",
            outcome.as_str(),
            document.pdf_id,
            document.sections.len()
        );
        Ok(outcome)
    }

    /// Removes every section titled `section_title` under `(username, pdf_id)`.
    ///
    /// Returns `false` (a soft no-op) when nothing matched.
    pub fn delete_section(
        &mut self,
        username: &str,
        pdf_id: &str,
        section_title: &str,
    ) -> StoreResult<bool> {
        let mut repo = SqliteUserRepository::try_new(self.conn_mut()?)?;
        let removed = repo.pull_sections(username, pdf_id, section_title)?;
        if removed > 0 {
            info!(
                "event=section_delete module=store status=ok pdf_id={} removed={}",
                pdf_id, removed
            );
        } else {
            info!(
                "event=section_delete module=store status=noop pdf_id={}",
                pdf_id
            );
        }
        Ok(removed > 0)
    }

    /// Lists the PDF ids with saved notes for `username`, in stored order.
    pub fn list_pdf_ids(&self, username: &str) -> StoreResult<Vec<PdfId>> {
        let Some(document) = find_user(self.conn()?, username)? else {
            return Ok(Vec::new());
        };
        let ids = document
            .get("notes")
            .and_then(Value::as_array)
            .map(|notes| {
                notes
                    .iter()
                    .filter_map(|entry| entry.get("pdf_id").and_then(pdf_id_text))
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    /// Checks the stored document for `username` against the schema.
    ///
    /// Returns `None` when the user does not exist. Purely informational.
    pub fn audit_user(&self, username: &str) -> StoreResult<Option<Vec<SchemaViolation>>> {
        let Some(document) = find_user(self.conn()?, username)? else {
            return Ok(None);
        };
        let violations = self.schema.check(&document);
        if !violations.is_empty() {
            warn!(
                "event=schema_audit module=store status=violations count={}",
                violations.len()
            );
        }
        Ok(Some(violations))
    }

    fn conn(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::NotConnected)
    }

    fn conn_mut(&mut self) -> StoreResult<&mut Connection> {
        self.conn.as_mut().ok_or(StoreError::NotConnected)
    }
}

fn open_and_probe(config: &StoreConfig) -> DbResult<(Connection, usize)> {
    let uri = StoreUri::parse(&config.uri)?;
    let conn = open_uri(&uri, &config.database_name)?;
    let databases = list_databases(&conn)?;
    Ok((conn, databases.len()))
}

/// Resolves `pdf_id` inside one raw user document.
pub(crate) fn lookup_in_document(document: &Value, pdf_id: &str) -> NoteLookup {
    let notes = match document.get("notes") {
        None | Some(Value::Null) => return NoteLookup::NoNotesForPdf,
        Some(Value::Array(notes)) => notes,
        Some(_) => {
            return NoteLookup::Malformed {
                reason: "`notes` is not an array".to_string(),
            }
        }
    };

    let Some(entry) = notes.iter().find(|entry| entry_matches(entry, pdf_id)) else {
        return NoteLookup::NoNotesForPdf;
    };

    match serde_json::from_value::<NoteEntry>(entry.clone()) {
        Ok(entry) => NoteLookup::Found(entry.into()),
        Err(err) => NoteLookup::Malformed {
            reason: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{lookup_in_document, NoteLookup};
    use crate::model::note::NoteDocument;
    use serde_json::json;

    #[test]
    fn lookup_finds_entry_and_preserves_section_order() {
        let document = json!({
            "username": "alice",
            "notes": [
                {"pdf_id": "other", "chapter": {"chapter_title": "X", "sections": []}},
                {"pdf_id": "ch2", "chapter": {"chapter_title": "Intro", "sections": [
                    {"sectionTitle": "B", "sectionNotes": "2"},
                    {"sectionTitle": "A", "sectionNotes": "1"}
                ]}}
            ]
        });

        let expected = NoteDocument::new("ch2", "Intro")
            .with_section("B", "2")
            .with_section("A", "1");
        assert_eq!(
            lookup_in_document(&document, "ch2"),
            NoteLookup::Found(expected)
        );
    }

    #[test]
    fn lookup_without_notes_or_match_is_absent() {
        assert_eq!(
            lookup_in_document(&json!({"username": "alice"}), "ch2"),
            NoteLookup::NoNotesForPdf
        );
        assert_eq!(
            lookup_in_document(&json!({"notes": []}), "ch2"),
            NoteLookup::NoNotesForPdf
        );
    }

    #[test]
    fn lookup_reports_missing_fields_as_malformed() {
        let missing_chapter = json!({"notes": [{"pdf_id": "ch2"}]});
        assert!(matches!(
            lookup_in_document(&missing_chapter, "ch2"),
            NoteLookup::Malformed { reason } if reason.contains("chapter")
        ));

        let missing_notes_text = json!({"notes": [{"pdf_id": "ch2", "chapter": {
            "chapter_title": "Intro",
            "sections": [{"sectionTitle": "A"}]
        }}]});
        assert!(matches!(
            lookup_in_document(&missing_notes_text, "ch2"),
            NoteLookup::Malformed { reason } if reason.contains("sectionNotes")
        ));

        assert!(matches!(
            lookup_in_document(&json!({"notes": "oops"}), "ch2"),
            NoteLookup::Malformed { .. }
        ));
    }
}
