//! Interactive note session.
//!
//! # Responsibility
//! - Wire line-based user commands to the core editor session and store.
//! - Keep all rendering concerns (placeholder hints, list layout) out of
//!   core business logic.
//!
//! # Invariants
//! - The store connection is opened once at startup and dropped on exit.
//! - A startup storage failure is fatal; everything after that degrades to
//!   a printed error and an unchanged session.

use log::{info, warn};
use notemaker_core::db::open_db;
use notemaker_core::{
    core_version, default_log_level, init_logging, EditorSession, NoteRepository,
    SqliteNoteRepository,
};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

const DB_FILE: &str = "notes.db";

fn main() -> ExitCode {
    init_logging_best_effort();

    let conn = match open_db(DB_FILE) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to initialize note storage: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = {
        let browse = match SqliteNoteRepository::try_new(&conn) {
            Ok(repo) => repo,
            Err(err) => {
                eprintln!("note storage is not usable: {err}");
                return ExitCode::FAILURE;
            }
        };
        let session = match SqliteNoteRepository::try_new(&conn) {
            Ok(repo) => EditorSession::new(repo),
            Err(err) => {
                eprintln!("note storage is not usable: {err}");
                return ExitCode::FAILURE;
            }
        };
        run_loop(browse, session)
    };

    // `conn` drops here, releasing the store on every exit path.
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("terminal error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging_best_effort() {
    let log_dir = match std::env::current_dir() {
        Ok(dir) => dir.join("logs"),
        Err(err) => {
            eprintln!("warning: cannot resolve working directory for logs: {err}");
            return;
        }
    };
    let Some(log_dir) = log_dir.to_str() else {
        eprintln!("warning: log directory path is not valid UTF-8; logging disabled");
        return;
    };
    if let Err(err) = init_logging(default_log_level(), log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn run_loop(
    browse: SqliteNoteRepository<'_>,
    mut session: EditorSession<SqliteNoteRepository<'_>>,
) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("note maker {} — type `help` for commands", core_version());
    print_titles("notes", browse.list_titles());
    info!("event=session_start module=cli status=ok");

    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let (command, rest) = split_command(&line);

        match command {
            "" => {}
            "help" => print_help(),
            "list" => print_titles("notes", browse.list_titles()),
            "search" => print_titles("matches", browse.search(rest)),
            "open" => match session.select(rest) {
                Ok(true) => print_buffers(&session),
                Ok(false) => println!("no note titled `{rest}`"),
                Err(err) => println!("error: {err}"),
            },
            "new" => {
                session.reset();
                println!("editing a new note");
            }
            "title" => session.set_title(rest),
            "category" => session.set_category(rest),
            "content" => session.set_content(rest),
            "show" => print_buffers(&session),
            "save" => match session.save() {
                Ok(title) => {
                    println!("saved `{title}`");
                    print_titles("notes", browse.list_titles());
                }
                Err(err) => println!("error: {err}"),
            },
            "delete" => match session.delete_selected() {
                Ok(true) => {
                    println!("note deleted");
                    print_titles("notes", browse.list_titles());
                }
                Ok(false) => println!("no note selected"),
                Err(err) => println!("error: {err}"),
            },
            "quit" | "exit" => break,
            other => println!("unknown command `{other}`; type `help`"),
        }
    }

    info!("event=session_end module=cli status=ok");
    Ok(())
}

fn split_command(line: &str) -> (&str, &str) {
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    }
}

fn print_help() {
    println!(
        "commands:\n  \
         list                 show all notes, newest first\n  \
         search <text>        substring search over title/category/content\n  \
         open <title>         load a note into the editor\n  \
         new                  start a fresh note\n  \
         title <text>         set the title buffer\n  \
         category <text>      set the category buffer\n  \
         content <text>       set the content buffer\n  \
         show                 print the current buffers\n  \
         save                 persist the buffers (upsert by title)\n  \
         delete               delete the selected note\n  \
         quit                 exit"
    );
}

fn print_titles(label: &str, titles: Result<Vec<String>, notemaker_core::RepoError>) {
    match titles {
        Ok(titles) if titles.is_empty() => println!("{label}: (none)"),
        Ok(titles) => {
            println!("{label}:");
            for title in titles {
                println!("  {title}");
            }
        }
        Err(err) => {
            warn!("event=list_refresh module=cli status=error error={err}");
            println!("error: {err}");
        }
    }
}

fn print_buffers(session: &EditorSession<SqliteNoteRepository<'_>>) {
    // Placeholder rendering lives here, not in validation: empty buffers
    // get a visual hint and nothing else.
    match session.selected_title() {
        Some(title) => println!("editing `{title}`"),
        None => println!("editing a new note"),
    }
    println!("  title:    {}", or_placeholder(session.title()));
    println!("  category: {}", or_placeholder(session.category()));
    println!("  content:  {}", or_placeholder(session.content()));
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        "(empty)"
    } else {
        value
    }
}
