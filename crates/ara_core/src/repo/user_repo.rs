//! User-notes repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Read raw user documents from the `users` collection.
//! - Upsert one note entry per `(username, pdf_id)` in a single transaction.
//! - Pull sections by exact title from one note entry.
//!
//! # Invariants
//! - At most one note entry per PDF id is created by this repository.
//! - Saving an existing entry replaces its chapter title and whole section list.
//! - Fields this repository does not own are left untouched in stored documents.

use crate::model::user::{entry_matches, NoteEntry, UserRecord};
use crate::repo::collection::{ensure_documents_table, Collection, USERS_COLLECTION};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{Connection, TransactionBehavior};
use serde_json::{Map, Value};

/// Which branch of the upsert a save took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No user document existed; one was created with a single entry.
    CreatedUser,
    /// The user existed without notes for this PDF; an entry was appended.
    AppendedEntry,
    /// An entry for this PDF existed; its title and sections were replaced.
    ReplacedEntry,
}

impl UpsertOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedUser => "created_user",
            Self::AppendedEntry => "appended_entry",
            Self::ReplacedEntry => "replaced_entry",
        }
    }
}

/// Repository interface for per-user note documents.
pub trait UserRepository {
    /// Creates the user, appends the entry, or overwrites the existing entry.
    fn upsert_note_entry(&mut self, username: &str, entry: &NoteEntry)
        -> RepoResult<UpsertOutcome>;
    /// Removes every section titled `title` under `(username, pdf_id)`.
    ///
    /// Returns the number of sections removed.
    fn pull_sections(&mut self, username: &str, pdf_id: &str, title: &str) -> RepoResult<usize>;
}

/// SQLite-backed user-notes repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_documents_table(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn upsert_note_entry(
        &mut self,
        username: &str,
        entry: &NoteEntry,
    ) -> RepoResult<UpsertOutcome> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = {
            let users = Collection::new(&tx, USERS_COLLECTION);
            match users.find_one(username)? {
                None => {
                    let record = UserRecord::with_entry(username, entry.clone());
                    users.insert_one(username, &serde_json::to_value(&record)?)?;
                    UpsertOutcome::CreatedUser
                }
                Some(mut document) => {
                    let outcome = apply_entry(&mut document, entry)?;
                    users.replace_one(username, &document)?;
                    outcome
                }
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    fn pull_sections(&mut self, username: &str, pdf_id: &str, title: &str) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = {
            let users = Collection::new(&tx, USERS_COLLECTION);
            match users.find_one(username)? {
                None => 0,
                Some(mut document) => {
                    let removed = remove_sections(&mut document, pdf_id, title);
                    if removed > 0 {
                        users.replace_one(username, &document)?;
                    }
                    removed
                }
            }
        };

        tx.commit()?;
        Ok(removed)
    }
}

/// Returns the raw stored document for `username`.
pub fn find_user(conn: &Connection, username: &str) -> RepoResult<Option<Value>> {
    Collection::new(conn, USERS_COLLECTION).find_one(username)
}

fn apply_entry(document: &mut Value, entry: &NoteEntry) -> RepoResult<UpsertOutcome> {
    let object = document
        .as_object_mut()
        .ok_or_else(|| RepoError::InvalidData("user document is not an object".to_string()))?;
    let notes = object
        .entry("notes")
        .or_insert_with(|| Value::Array(Vec::new()));
    if notes.is_null() {
        *notes = Value::Array(Vec::new());
    }
    let notes = notes
        .as_array_mut()
        .ok_or_else(|| RepoError::InvalidData("user `notes` is not an array".to_string()))?;

    let Some(position) = notes
        .iter()
        .position(|candidate| entry_matches(candidate, &entry.pdf_id))
    else {
        notes.push(serde_json::to_value(entry)?);
        return Ok(UpsertOutcome::AppendedEntry);
    };

    let existing = notes[position]
        .as_object_mut()
        .ok_or_else(|| RepoError::InvalidData("note entry is not an object".to_string()))?;
    let chapter = existing
        .entry("chapter")
        .or_insert_with(|| Value::Object(Map::new()));
    if !chapter.is_object() {
        *chapter = Value::Object(Map::new());
    }
    chapter["chapter_title"] = Value::String(entry.chapter.chapter_title.clone());
    chapter["sections"] = serde_json::to_value(&entry.chapter.sections)?;

    Ok(UpsertOutcome::ReplacedEntry)
}

fn remove_sections(document: &mut Value, pdf_id: &str, title: &str) -> usize {
    let sections = document
        .get_mut("notes")
        .and_then(Value::as_array_mut)
        .and_then(|notes| {
            notes
                .iter_mut()
                .find(|candidate| entry_matches(candidate, pdf_id))
        })
        .and_then(|entry| entry.get_mut("chapter"))
        .and_then(|chapter| chapter.get_mut("sections"))
        .and_then(Value::as_array_mut);

    let Some(sections) = sections else {
        return 0;
    };

    let before = sections.len();
    sections.retain(|section| section.get("sectionTitle").and_then(Value::as_str) != Some(title));
    before - sections.len()
}
