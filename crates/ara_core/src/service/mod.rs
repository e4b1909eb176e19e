//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into note use-cases.
//! - Keep UI layers decoupled from storage details.

pub mod store;
