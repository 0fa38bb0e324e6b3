//! Editor session state machine.
//!
//! # Responsibility
//! - Own the transient edit buffers for the note currently being viewed.
//! - Mediate between single user actions and single note store calls.
//!
//! # Invariants
//! - The session is in one of two states: Editing-Existing
//!   (`selected_title` is set) or Editing-New (it is not).
//! - A successful save or delete always returns the session to Editing-New
//!   with empty buffers.
//! - Selecting a title that has vanished from the store leaves buffers
//!   untouched; a stale list entry is benign, not an error.
//! - Log events carry metadata only (lengths, status), never note text.

use crate::model::note::{NoteDraft, NoteValidationError};
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error surfaced by [`EditorSession::save`].
#[derive(Debug)]
pub enum SessionError {
    /// Empty title or content; nothing was written.
    Validation(NoteValidationError),
    /// Storage-layer failure; prior state unchanged.
    Storage(RepoError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<NoteValidationError> for SessionError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        // The store validates drafts too; keep the taxonomy stable for
        // callers regardless of which layer caught it.
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

/// In-memory editing state over a note store.
pub struct EditorSession<R: NoteRepository> {
    repo: R,
    selected_title: Option<String>,
    title_buffer: String,
    category_buffer: String,
    content_buffer: String,
}

impl<R: NoteRepository> EditorSession<R> {
    /// Creates a session in Editing-New state with empty buffers.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            selected_title: None,
            title_buffer: String::new(),
            category_buffer: String::new(),
            content_buffer: String::new(),
        }
    }

    /// Title of the note being edited, or `None` in Editing-New state.
    pub fn selected_title(&self) -> Option<&str> {
        self.selected_title.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title_buffer
    }

    pub fn category(&self) -> &str {
        &self.category_buffer
    }

    pub fn content(&self) -> &str {
        &self.content_buffer
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.title_buffer = value.into();
    }

    pub fn set_category(&mut self, value: impl Into<String>) {
        self.category_buffer = value.into();
    }

    pub fn set_content(&mut self, value: impl Into<String>) {
        self.content_buffer = value.into();
    }

    /// Loads a note into the buffers and switches to Editing-Existing.
    ///
    /// Returns `false` without touching the buffers when the title no longer
    /// exists in the store.
    pub fn select(&mut self, title: &str) -> RepoResult<bool> {
        match self.repo.load(title)? {
            Some(note) => {
                self.title_buffer = note.title.clone();
                self.category_buffer = note.category;
                self.content_buffer = note.content;
                self.selected_title = Some(note.title);
                debug!("event=note_select module=session status=ok");
                Ok(true)
            }
            None => {
                debug!("event=note_select module=session status=stale");
                Ok(false)
            }
        }
    }

    /// Clears all buffers and returns to Editing-New.
    pub fn reset(&mut self) {
        self.selected_title = None;
        self.title_buffer.clear();
        self.category_buffer.clear();
        self.content_buffer.clear();
    }

    /// Validates the buffers and upserts them into the store.
    ///
    /// On success the session resets to Editing-New and the stored title is
    /// returned so the caller can refresh its list view.
    pub fn save(&mut self) -> Result<String, SessionError> {
        let draft = NoteDraft::new(
            self.title_buffer.as_str(),
            self.category_buffer.as_str(),
            self.content_buffer.as_str(),
        )
        .normalized()?;

        let title_chars = draft.title.chars().count();
        let content_chars = draft.content.chars().count();
        let stored_title = self.repo.upsert(&draft)?;

        info!(
            "event=note_save module=session status=ok title_chars={title_chars} content_chars={content_chars}"
        );
        self.reset();
        Ok(stored_title)
    }

    /// Deletes the selected note, if any, and resets the session.
    ///
    /// Returns `false` when nothing was selected (Editing-New is a no-op).
    pub fn delete_selected(&mut self) -> RepoResult<bool> {
        // Clone so a storage failure leaves the selection intact.
        let Some(title) = self.selected_title.clone() else {
            return Ok(false);
        };

        self.repo.delete(&title)?;
        info!("event=note_delete module=session status=ok");
        self.reset();
        Ok(true)
    }
}
