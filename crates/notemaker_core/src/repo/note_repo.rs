//! Note store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide durable CRUD and substring search over the `notes` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths normalize drafts via `NoteDraft::normalized()` first.
//! - The title is the upsert key; saving an existing title overwrites
//!   category, content and `created_at` in place.
//! - `list_titles` orders by `created_at DESC, id DESC` so same-millisecond
//!   saves still come back newest first.
//! - `delete` is idempotent; a missing title is indistinguishable from
//!   success.

use crate::db::DbError;
use crate::model::note::{Note, NoteDraft, NoteValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    category,
    content,
    created_at
FROM notes";

// ISO-8601 UTC with millisecond precision; lexicographic order matches
// chronological order, which `list_titles` relies on.
const SAVE_TIMESTAMP_SQL: &str = "strftime('%Y-%m-%dT%H:%M:%f', 'now')";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing from storage")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing from storage")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store interface for note CRUD and search.
pub trait NoteRepository {
    /// Returns all note titles, most recently saved first.
    fn list_titles(&self) -> RepoResult<Vec<String>>;
    /// Gets one note by exact title. `None` when no such title exists.
    fn load(&self, title: &str) -> RepoResult<Option<Note>>;
    /// Inserts or overwrites the note keyed by the draft title.
    /// Returns the stored (normalized) title.
    fn upsert(&self, draft: &NoteDraft) -> RepoResult<String>;
    /// Removes the note with the given title. Missing titles are a no-op.
    fn delete(&self, title: &str) -> RepoResult<()>;
    /// Case-insensitive substring match over title, category and content.
    /// A blank needle matches every note; result order is storage order.
    fn search(&self, needle: &str) -> RepoResult<Vec<String>>;
}

/// SQLite-backed note repository.
#[derive(Debug)]
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn list_titles(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title FROM notes ORDER BY created_at DESC, id DESC;")?;
        let titles = collect_titles(stmt.query([])?);
        titles
    }

    fn load(&self, title: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE title = ?1;"))?;
        let mut rows = stmt.query([title])?;
        match rows.next()? {
            Some(row) => Ok(Some(note_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn upsert(&self, draft: &NoteDraft) -> RepoResult<String> {
        let draft = draft.normalized()?;

        self.conn.execute(
            &format!(
                "INSERT INTO notes (title, category, content, created_at)
                 VALUES (?1, ?2, ?3, {SAVE_TIMESTAMP_SQL})
                 ON CONFLICT(title) DO UPDATE SET
                    category = excluded.category,
                    content = excluded.content,
                    created_at = excluded.created_at;"
            ),
            params![draft.title, draft.category, draft.content],
        )?;

        Ok(draft.title)
    }

    fn delete(&self, title: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM notes WHERE title = ?1;", [title])?;
        Ok(())
    }

    fn search(&self, needle: &str) -> RepoResult<Vec<String>> {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            let mut stmt = self.conn.prepare("SELECT title FROM notes;")?;
            return collect_titles(stmt.query([])?);
        }

        let pattern = format!("%{}%", escape_like(&needle));
        let mut stmt = self.conn.prepare(
            "SELECT title FROM notes
             WHERE title LIKE ?1 ESCAPE '\\'
                OR category LIKE ?1 ESCAPE '\\'
                OR content LIKE ?1 ESCAPE '\\';",
        )?;
        let titles = collect_titles(stmt.query([pattern.as_str()])?);
        titles
    }
}

/// Escapes LIKE metacharacters so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn collect_titles(mut rows: rusqlite::Rows<'_>) -> RepoResult<Vec<String>> {
    let mut titles = Vec::new();
    while let Some(row) = rows.next()? {
        titles.push(row.get(0)?);
    }
    Ok(titles)
}

fn note_from_row(row: &Row<'_>) -> RepoResult<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        category: row.get("category")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for column in ["id", "title", "category", "content", "created_at"] {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
