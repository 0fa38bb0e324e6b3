//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate note store calls into editor-level APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod editor_session;
