//! Reading-session state for the PDF note-taking flow.
//!
//! # Responsibility
//! - Track the SQ3R study prompt as the reader pages and writes.
//! - Hold the session context (user, PDF, page cursor, store) explicitly.
//!
//! # Invariants
//! - A session edits exactly one `(username, pdf_id)` pair.

pub mod catalog;
pub mod prompt;
pub mod session;
