//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the note store contract used by the editor session.
//! - Isolate SQLite query details from session orchestration.
//!
//! # Invariants
//! - Repository writes normalize and validate drafts before SQL mutations.
//! - Repository APIs surface storage failures; they never swallow them.

pub mod note_repo;
