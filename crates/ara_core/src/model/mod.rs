//! Domain model for per-user chapter notes.
//!
//! # Responsibility
//! - Define the stored user document shape and its embedded note entries.
//! - Define the transient `NoteDocument` exchanged between editors and the store.
//!
//! # Invariants
//! - A user document holds at most one note entry per PDF id.
//! - Section order is significant and preserved end to end.

pub mod note;
pub mod user;
