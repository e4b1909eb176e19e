//! Stored user document model.
//!
//! # Invariants
//! - `username` is the unique key of a user document.
//! - `pdf_id` is compared in its string form, so a stored integer `4` and the
//!   string `"4"` name the same PDF.

use crate::model::note::Section;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a PDF within the reading catalog.
pub type PdfId = String;

/// Top-level stored record: one per username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(default)]
    pub notes: Vec<NoteEntry>,
}

impl UserRecord {
    /// Creates a user record holding a single note entry.
    pub fn with_entry(username: impl Into<String>, entry: NoteEntry) -> Self {
        Self {
            username: username.into(),
            notes: vec![entry],
        }
    }

    /// Finds the entry for `pdf_id` by linear scan.
    pub fn entry(&self, pdf_id: &str) -> Option<&NoteEntry> {
        self.notes.iter().find(|entry| entry.pdf_id == pdf_id)
    }
}

/// Links one PDF id to its chapter notes inside a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    #[serde(deserialize_with = "deserialize_pdf_id")]
    pub pdf_id: PdfId,
    pub chapter: Chapter,
}

/// Chapter title plus its ordered sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter_title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Returns the string form of a stored `pdf_id` value.
///
/// Strings are returned as-is and integers in decimal. Anything else has no
/// usable identity and yields `None`.
pub fn pdf_id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.is_i64() || number.is_u64() => Some(number.to_string()),
        _ => None,
    }
}

/// Returns whether a raw note entry carries the given PDF id.
pub fn entry_matches(entry: &Value, pdf_id: &str) -> bool {
    entry
        .get("pdf_id")
        .and_then(pdf_id_text)
        .is_some_and(|text| text == pdf_id)
}

fn deserialize_pdf_id<'de, D>(deserializer: D) -> Result<PdfId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    pdf_id_text(&value).ok_or_else(|| {
        <D::Error as de::Error>::custom(format!("pdf_id must be a string or integer, got {value}"))
    })
}
