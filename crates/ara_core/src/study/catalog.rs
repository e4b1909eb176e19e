//! Catalog of readable PDFs.
//!
//! The chapter title doubles as the PDF id.

use crate::model::note::EXAMPLE_CHAPTER_ID;
use crate::model::user::PdfId;
use std::path::PathBuf;

/// One selectable PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfEntry {
    pub pdf_id: PdfId,
    /// Path relative to the resources directory.
    pub path: PathBuf,
}

/// Ordered set of PDFs offered to the reader.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PdfCatalog {
    entries: Vec<PdfEntry>,
}

impl PdfCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chapters bundled with the application.
    pub fn bundled() -> Self {
        Self::new()
            .with_entry("Chapter 6", "Sommerville_Chapter_6_Survey_Highlighted.pdf")
            .with_entry("Chapter 3", "Chapter3.pdf")
            .with_entry("Chapter 2", "Sommerville-Chapter-2.pdf")
            .with_entry(EXAMPLE_CHAPTER_ID, "Sommerville-Chapter-2.pdf")
    }

    /// Adds or replaces the entry for `pdf_id`.
    pub fn with_entry(mut self, pdf_id: impl Into<PdfId>, path: impl Into<PathBuf>) -> Self {
        let entry = PdfEntry {
            pdf_id: pdf_id.into(),
            path: path.into(),
        };
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.pdf_id == entry.pdf_id)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    pub fn get(&self, pdf_id: &str) -> Option<&PdfEntry> {
        self.entries.iter().find(|entry| entry.pdf_id == pdf_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.pdf_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
