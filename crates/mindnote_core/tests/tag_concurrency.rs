use mindnote_core::{NoteInput, NoteService, SqliteStore, TaskInput, TaskService};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn concurrent_writers_share_one_tag_row() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("mindnote.sqlite3");
    drop(SqliteStore::open(&db_path).unwrap());

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|worker| {
            let db_path = db_path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut store = SqliteStore::open(&db_path).unwrap();
                barrier.wait();
                if worker == 0 {
                    NoteService::new(&mut store)
                        .create_note(NoteInput::new("from notes").with_tags(["Shared"]))
                        .unwrap()
                        .tags
                } else {
                    TaskService::new(&mut store)
                        .create_task(TaskInput::new("from tasks").with_tags(["Shared"]))
                        .unwrap()
                        .tags
                }
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec!["Shared".to_string()]);
    }

    let store = SqliteStore::open(&db_path).unwrap();
    let (rows, distinct_linked): (i64, i64) = store
        .connection()
        .query_row(
            "SELECT
                (SELECT COUNT(*) FROM tags WHERE name = 'Shared'),
                (SELECT COUNT(DISTINCT tag_id) FROM (
                    SELECT tag_id FROM note_tags
                    UNION ALL
                    SELECT tag_id FROM task_tags
                ));",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(distinct_linked, 1);
}
