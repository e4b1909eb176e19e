//! One reader's editing session over one PDF.
//!
//! # Responsibility
//! - Carry the session context explicitly (no process-wide globals).
//! - Route edits into a `NoteDocument` and persist it through the `Store`.
//!
//! # Invariants
//! - Saved notes take precedence over the prewritten example chapter.
//! - Saving while the store is disconnected returns `NotConnected` and leaves
//!   the in-memory document intact.

use crate::model::note::{NoteDocument, Section, EXAMPLE_CHAPTER_ID};
use crate::model::user::PdfId;
use crate::repo::user_repo::UpsertOutcome;
use crate::service::store::{Store, StoreError, StoreResult};
use crate::study::prompt::{PromptTracker, Sq3rStage};
use log::{info, warn};
use uuid::Uuid;

pub struct ReadingSession<'store> {
    id: Uuid,
    store: &'store mut Store,
    username: String,
    document: NoteDocument,
    page: usize,
    page_count: usize,
    prompts: PromptTracker,
}

impl<'store> ReadingSession<'store> {
    /// Opens a session, loading saved notes when the store is connected.
    pub fn open(
        store: &'store mut Store,
        username: impl Into<String>,
        pdf_id: impl Into<PdfId>,
        page_count: usize,
    ) -> StoreResult<Self> {
        let id = Uuid::new_v4();
        let username = username.into();
        let pdf_id = pdf_id.into();

        let saved = if store.is_connected() {
            store.fetch_notes(&username, &pdf_id)?
        } else {
            warn!(
                "event=session_open module=study status=offline session_id={} pdf_id={}",
                id, pdf_id
            );
            None
        };
        let loaded = saved.is_some();
        let document = saved.unwrap_or_else(|| starting_document(pdf_id));

        info!(
            "event=session_open module=study status=ok session_id={} pdf_id={} loaded={} sections={}",
            id,
            document.pdf_id,
            loaded,
            document.sections.len()
        );

        Ok(Self {
            id,
            store,
            username,
            document,
            page: 0,
            page_count,
            prompts: PromptTracker::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn document(&self) -> &NoteDocument {
        &self.document
    }

    pub fn is_online(&self) -> bool {
        self.store.is_connected()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn prompts(&self) -> &PromptTracker {
        &self.prompts
    }

    pub fn toggle_prompts(&mut self) -> bool {
        self.prompts.toggle_visibility()
    }

    pub fn set_chapter_title(&mut self, title: impl Into<String>) {
        self.document.chapter_title = title.into();
    }

    /// Appends a section; blank titles become "Untitled Section".
    pub fn add_section(&mut self, title: &str, notes: impl Into<String>) {
        self.document
            .sections
            .push(Section::titled_or_default(title, notes));
        self.prompts.update(Sq3rStage::Recite);
    }

    /// Marks that the reader started typing notes.
    pub fn record_typing(&mut self) {
        self.prompts.update(Sq3rStage::Recite);
    }

    /// Advances one page when possible and rotates the prompt.
    pub fn next_page(&mut self) -> usize {
        if self.page + 1 < self.page_count {
            self.page += 1;
        }
        self.prompts.update(Sq3rStage::after_next_page(self.page));
        self.page
    }

    /// Steps back one page when possible and rotates the prompt.
    pub fn prev_page(&mut self) -> usize {
        self.page = self.page.saturating_sub(1);
        self.prompts.update(Sq3rStage::after_prev_page(self.page));
        self.page
    }

    /// Signals the reader wants to leave; suggests a review.
    pub fn request_exit(&mut self) {
        self.prompts.update(Sq3rStage::Review);
    }

    /// Persists the current document.
    pub fn save(&mut self) -> StoreResult<UpsertOutcome> {
        if !self.store.is_connected() {
            warn!(
                "event=session_save module=study status=offline session_id={}",
                self.id
            );
            return Err(StoreError::NotConnected);
        }
        self.store.save_notes(&self.username, &self.document)
    }

    /// Removes sections titled `title` locally and, when online, from the store.
    ///
    /// Returns how many sections were removed from the in-memory document.
    pub fn delete_section(&mut self, title: &str) -> StoreResult<usize> {
        let removed = self.document.remove_sections_titled(title);
        if self.store.is_connected() {
            self.store
                .delete_section(&self.username, &self.document.pdf_id, title)?;
        }
        Ok(removed)
    }

    /// PDF ids this user has saved notes for.
    pub fn saved_pdf_ids(&self) -> StoreResult<Vec<PdfId>> {
        self.store.list_pdf_ids(&self.username)
    }

    /// Ends the session, saving first when the store is connected.
    pub fn close(mut self) -> StoreResult<()> {
        if self.store.is_connected() {
            self.save()?;
        }
        info!(
            "event=session_close module=study status=ok session_id={}",
            self.id
        );
        Ok(())
    }
}

fn starting_document(pdf_id: PdfId) -> NoteDocument {
    if pdf_id == EXAMPLE_CHAPTER_ID {
        NoteDocument::example_chapter()
    } else {
        NoteDocument::new(pdf_id, "")
    }
}
