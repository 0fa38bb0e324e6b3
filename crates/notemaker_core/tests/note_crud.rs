use notemaker_core::db::open_db_in_memory;
use notemaker_core::{Note, NoteDraft, NoteRepository, NoteValidationError, RepoError, SqliteNoteRepository};
use rusqlite::Connection;

#[test]
fn upsert_and_load_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let stored = repo
        .upsert(&NoteDraft::new("Shopping", "home", "milk"))
        .unwrap();
    assert_eq!(stored, "Shopping");

    let loaded = repo.load("Shopping").unwrap().unwrap();
    assert_eq!(loaded.title, "Shopping");
    assert_eq!(loaded.category, "home");
    assert_eq!(loaded.content, "milk");
    assert!(!loaded.created_at.is_empty());
}

#[test]
fn upsert_normalizes_whitespace_and_blank_category() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let stored = repo
        .upsert(&NoteDraft::new("  Trimmed  ", "   ", "  body  "))
        .unwrap();
    assert_eq!(stored, "Trimmed");

    let loaded = repo.load("Trimmed").unwrap().unwrap();
    assert_eq!(loaded.category, "");
    assert_eq!(loaded.content, "body");
}

#[test]
fn upsert_overwrites_existing_title_in_place() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    repo.upsert(&NoteDraft::new("A", "x", "y")).unwrap();
    repo.upsert(&NoteDraft::new("A", "z", "w")).unwrap();

    assert_eq!(note_count(&conn), 1);
    let loaded = repo.load("A").unwrap().unwrap();
    assert_eq!(loaded.category, "z");
    assert_eq!(loaded.content, "w");
}

#[test]
fn created_at_is_overwritten_on_every_save() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    repo.upsert(&NoteDraft::new("A", "", "v1")).unwrap();
    force_created_at(&conn, "A", "2020-01-01T00:00:00.000");

    repo.upsert(&NoteDraft::new("A", "", "v2")).unwrap();
    let loaded = repo.load("A").unwrap().unwrap();
    assert_ne!(loaded.created_at, "2020-01-01T00:00:00.000");
}

#[test]
fn renaming_title_creates_a_second_note() {
    // Title is the business key, so editing the title field and saving
    // leaves the old row behind. Inherited product behavior.
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    repo.upsert(&NoteDraft::new("Old", "", "body")).unwrap();
    repo.upsert(&NoteDraft::new("New", "", "body")).unwrap();

    assert_eq!(note_count(&conn), 2);
    assert!(repo.load("Old").unwrap().is_some());
    assert!(repo.load("New").unwrap().is_some());
}

#[test]
fn load_missing_title_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    assert!(repo.load("nope").unwrap().is_none());
}

#[test]
fn delete_is_idempotent_for_missing_titles() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    repo.delete("never existed").unwrap();

    repo.upsert(&NoteDraft::new("A", "", "body")).unwrap();
    repo.delete("A").unwrap();
    repo.delete("A").unwrap();
    assert_eq!(note_count(&conn), 0);
}

#[test]
fn validation_failures_leave_store_untouched() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let empty_title = repo.upsert(&NoteDraft::new("", "cat", "content"));
    assert!(matches!(
        empty_title,
        Err(RepoError::Validation(NoteValidationError::EmptyTitle))
    ));

    let empty_content = repo.upsert(&NoteDraft::new("T", "cat", ""));
    assert!(matches!(
        empty_content,
        Err(RepoError::Validation(NoteValidationError::EmptyContent))
    ));

    assert_eq!(note_count(&conn), 0);
}

#[test]
fn list_titles_returns_most_recently_saved_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    repo.upsert(&NoteDraft::new("A", "", "a")).unwrap();
    repo.upsert(&NoteDraft::new("B", "", "b")).unwrap();
    repo.upsert(&NoteDraft::new("C", "", "c")).unwrap();

    force_created_at(&conn, "A", "2026-03-01T10:00:00.000");
    force_created_at(&conn, "B", "2026-03-01T10:00:01.000");
    force_created_at(&conn, "C", "2026-03-01T10:00:02.000");

    assert_eq!(repo.list_titles().unwrap(), vec!["C", "B", "A"]);
}

#[test]
fn list_titles_breaks_timestamp_ties_by_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    repo.upsert(&NoteDraft::new("First", "", "a")).unwrap();
    repo.upsert(&NoteDraft::new("Second", "", "b")).unwrap();

    force_created_at(&conn, "First", "2026-03-01T10:00:00.000");
    force_created_at(&conn, "Second", "2026-03-01T10:00:00.000");

    assert_eq!(repo.list_titles().unwrap(), vec!["Second", "First"]);
}

#[test]
fn try_new_rejects_connection_without_notes_table() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteNoteRepository::try_new(&conn).unwrap_err();
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
}

#[test]
fn note_serializes_with_schema_field_names() {
    let note = Note {
        id: 7,
        title: "T".to_string(),
        category: "".to_string(),
        content: "body".to_string(),
        created_at: "2026-03-01T10:00:00.000".to_string(),
    };

    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["title"], "T");
    assert_eq!(json["created_at"], "2026-03-01T10:00:00.000");
    assert_eq!(json["id"], 7);
}

fn note_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap()
}

fn force_created_at(conn: &Connection, title: &str, timestamp: &str) {
    conn.execute(
        "UPDATE notes SET created_at = ?1 WHERE title = ?2;",
        rusqlite::params![timestamp, title],
    )
    .unwrap();
}
