//! Note transfer objects.
//!
//! `NoteDocument` is built fresh for each editing session and projected into
//! (or out of) the stored `NoteEntry`. It is never persisted on its own.

use crate::model::user::{Chapter, NoteEntry, PdfId};
use serde::{Deserialize, Serialize};

/// Title used when an editor submits a section with a blank title.
pub const UNTITLED_SECTION: &str = "Untitled Section";

/// PDF id that opens with prewritten example notes.
pub const EXAMPLE_CHAPTER_ID: &str = "Example Chapter";

const EXAMPLE_CHAPTER_TITLE: &str = "Software processes";
const EXAMPLE_SECTIONS: [(&str, &str); 4] = [
    (
        "Software process models",
        "A software process model is a simplified representation of a software process",
    ),
    (
        "Process activities",
        "Real software processes are interleaved sequences of technical, collaborative, and managerial activities with the overall goal of specifying, designing, implementing, and testing a software system",
    ),
    (
        "Coping with change",
        "Change adds to the costs of software development because it usually means that work that has been completed has to be redone. This is called rework.",
    ),
    (
        "Proccess improvement",
        "Two quite different approaches to process improvement and change are used: The process maturity approach and The agile approach",
    ),
];

/// A titled block of free-text notes within a chapter.
///
/// Serialized with the stored field names `sectionTitle` / `sectionNotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "sectionTitle")]
    pub title: String,
    #[serde(rename = "sectionNotes")]
    pub notes: String,
}

impl Section {
    pub fn new(title: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: notes.into(),
        }
    }

    /// Builds a section, substituting `UNTITLED_SECTION` for a blank title.
    ///
    /// Non-blank titles are trimmed.
    pub fn titled_or_default(title: &str, notes: impl Into<String>) -> Self {
        let trimmed = title.trim();
        let title = if trimmed.is_empty() {
            UNTITLED_SECTION
        } else {
            trimmed
        };
        Self::new(title, notes)
    }
}

/// One chapter's notes for a single PDF, as held by an editing session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteDocument {
    pub pdf_id: PdfId,
    pub chapter_title: String,
    pub sections: Vec<Section>,
}

impl NoteDocument {
    /// Creates an empty document for `pdf_id`.
    pub fn new(pdf_id: impl Into<PdfId>, chapter_title: impl Into<String>) -> Self {
        Self {
            pdf_id: pdf_id.into(),
            chapter_title: chapter_title.into(),
            sections: Vec::new(),
        }
    }

    /// Appends a section. No dedup or validation happens here.
    pub fn add_section(&mut self, title: impl Into<String>, notes: impl Into<String>) {
        self.sections.push(Section::new(title, notes));
    }

    /// Builder-style variant of `add_section`.
    pub fn with_section(mut self, title: impl Into<String>, notes: impl Into<String>) -> Self {
        self.add_section(title, notes);
        self
    }

    /// Returns sections whose title matches exactly.
    pub fn sections_titled<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a Section> {
        self.sections
            .iter()
            .filter(move |section| section.title == title)
    }

    /// Removes every section with the given title, returning how many were removed.
    pub fn remove_sections_titled(&mut self, title: &str) -> usize {
        let before = self.sections.len();
        self.sections.retain(|section| section.title != title);
        before - self.sections.len()
    }

    /// Prewritten notes shown for the bundled example chapter.
    pub fn example_chapter() -> Self {
        EXAMPLE_SECTIONS.iter().fold(
            Self::new(EXAMPLE_CHAPTER_ID, EXAMPLE_CHAPTER_TITLE),
            |doc, (title, notes)| doc.with_section(*title, *notes),
        )
    }

    /// Projects this document into its stored entry shape.
    pub fn to_entry(&self) -> NoteEntry {
        NoteEntry {
            pdf_id: self.pdf_id.clone(),
            chapter: Chapter {
                chapter_title: self.chapter_title.clone(),
                sections: self.sections.clone(),
            },
        }
    }
}

impl From<NoteEntry> for NoteDocument {
    fn from(entry: NoteEntry) -> Self {
        Self {
            pdf_id: entry.pdf_id,
            chapter_title: entry.chapter.chapter_title,
            sections: entry.chapter.sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteDocument, Section, EXAMPLE_CHAPTER_ID, UNTITLED_SECTION};
    use serde_json::json;

    #[test]
    fn add_section_keeps_order_and_duplicates() {
        let mut doc = NoteDocument::new("ch2", "Intro");
        doc.add_section("Overview", "a");
        doc.add_section("Summary", "b");
        doc.add_section("Overview", "c");

        let titles: Vec<&str> = doc.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Overview", "Summary", "Overview"]);
        assert_eq!(doc.sections_titled("Overview").count(), 2);
    }

    #[test]
    fn remove_sections_titled_drops_every_match() {
        let mut doc = NoteDocument::new("ch2", "Intro")
            .with_section("Overview", "a")
            .with_section("Summary", "b")
            .with_section("Overview", "c");

        assert_eq!(doc.remove_sections_titled("Overview"), 2);
        assert_eq!(doc.sections, vec![Section::new("Summary", "b")]);
        assert_eq!(doc.remove_sections_titled("Missing"), 0);
    }

    #[test]
    fn blank_titles_become_untitled() {
        assert_eq!(Section::titled_or_default("   ", "x").title, UNTITLED_SECTION);
        assert_eq!(Section::titled_or_default(" Recap ", "x").title, "Recap");
    }

    #[test]
    fn section_serializes_with_stored_field_names() {
        let value = serde_json::to_value(Section::new("Overview", "text1")).unwrap();
        assert_eq!(
            value,
            json!({"sectionTitle": "Overview", "sectionNotes": "text1"})
        );
    }

    #[test]
    fn example_chapter_has_prewritten_sections() {
        let doc = NoteDocument::example_chapter();
        assert_eq!(doc.pdf_id, EXAMPLE_CHAPTER_ID);
        assert_eq!(doc.chapter_title, "Software processes");
        assert_eq!(doc.sections.len(), 4);
        assert_eq!(doc.sections[0].title, "Software process models");
    }

    #[test]
    fn entry_projection_round_trips() {
        let doc = NoteDocument::new("ch2", "Intro").with_section("Overview", "text1");
        assert_eq!(NoteDocument::from(doc.to_entry()), doc);
    }
}
