//! CLI smoke entry point.
//!
//! Reads `MINDNOTE_*` configuration, starts file logging when a log
//! directory is configured, opens the store and prints a summary gathered
//! through the core services.

use log::error;
use mindnote_core::{
    CoreConfig, NoteFilter, NoteService, PageRequest, SqliteStore, TaskFilter, TaskService,
    TaskStatus, TaxonomyService,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("mindnote: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_ref() {
        mindnote_core::init_logging(config.log_level, &log_dir.to_string_lossy())?;
    }

    let mut store = match config.db_path.as_ref() {
        Some(path) => SqliteStore::open(path),
        None => SqliteStore::open_in_memory(),
    }
    .map_err(|err| format!("failed to open store: {err}"))?;

    let notes = NoteService::new(&mut store)
        .list_notes(NoteFilter::default(), PageRequest::new(0, 1))
        .map_err(|err| err.to_string())?;
    let tasks = TaskService::new(&mut store)
        .list_tasks(TaskFilter::default(), PageRequest::new(0, 1))
        .map_err(|err| err.to_string())?;
    let open_tasks = TaskService::new(&mut store)
        .list_tasks(
            TaskFilter::new(Some(TaskStatus::Todo), None, None, None),
            PageRequest::new(0, 1),
        )
        .map_err(|err| err.to_string())?;
    let mut taxonomy = TaxonomyService::new(&mut store);
    let categories = taxonomy.list_categories().map_err(|err| err.to_string())?;
    let tags = taxonomy.list_tags().map_err(|err| err.to_string())?;

    println!("mindnote_core ping={}", mindnote_core::ping());
    println!("mindnote_core version={}", mindnote_core::core_version());
    match config.db_path.as_ref() {
        Some(path) => println!("store={}", path.display()),
        None => println!("store=:memory:"),
    }
    println!("notes={}", notes.total_elements);
    println!("tasks={} todo={}", tasks.total_elements, open_tasks.total_elements);
    println!("categories={} tags={}", categories.len(), tags.len());
    Ok(())
}
