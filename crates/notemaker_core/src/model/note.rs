//! Note record and draft validation.
//!
//! # Responsibility
//! - Define the persisted note shape and the unsaved draft shape.
//! - Normalize draft fields before any write path touches storage.
//!
//! # Invariants
//! - `title` and `content` are non-empty after trimming.
//! - `category` is stored as the empty string when blank.
//! - `created_at` reflects the most recent save, not true creation time.
//!   This matches the original product behavior and is intentional.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A note as persisted in the `notes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Surrogate row id. Auto-assigned by storage, unused by business logic.
    pub id: i64,
    /// Unique business key. Renaming a title via the editor creates a new
    /// note rather than renaming this one; the old row stays behind.
    pub title: String,
    /// Optional grouping label; empty string when unset.
    pub category: String,
    /// Free-text body.
    pub content: String,
    /// UTC timestamp of the most recent save, ISO-8601 with milliseconds.
    pub created_at: String,
}

/// The three editable fields before they are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub category: String,
    pub content: String,
}

/// Validation failure for a note draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    EmptyContent,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be empty"),
            Self::EmptyContent => write!(f, "note content must not be empty"),
        }
    }
}

impl Error for NoteValidationError {}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            content: content.into(),
        }
    }

    /// Trims all fields and enforces the note contract.
    ///
    /// Validation checks true emptiness only; placeholder rendering is a
    /// presentation concern and no sentinel text ever reaches this layer.
    pub fn normalized(&self) -> Result<NoteDraft, NoteValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }

        let content = self.content.trim();
        if content.is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }

        Ok(NoteDraft {
            title: title.to_string(),
            category: self.category.trim().to_string(),
            content: content.to_string(),
        })
    }
}
