use mindnote_core::{
    EntityKind, NoteInput, NoteService, PageRequest, ServiceError, Sort, SqliteStore,
    TaskFilter, TaskInput, TaskPriority, TaskRecord, TaskService, TaskSortField, TaskStatus,
    TaxonomyService,
};
use std::thread::sleep;
use std::time::Duration;

fn assert_completion_consistent(task: &TaskRecord) {
    assert_eq!(
        task.completed_at.is_some(),
        task.status == TaskStatus::Done,
        "completed_at must be set exactly when DONE: {task:?}"
    );
}

fn count(store: &SqliteStore, table: &str) -> i64 {
    store
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
            row.get(0)
        })
        .unwrap()
}

#[test]
fn create_applies_todo_and_medium_defaults() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let task = TaskService::new(&mut store)
        .create_task(TaskInput::new("Write report"))
        .unwrap();

    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.priority, TaskPriority::Medium);
    assert_eq!(task.completed_at, None);
    assert_eq!(task.due_date, None);
    assert!(task.tags.is_empty());
    assert_completion_consistent(&task);
}

#[test]
fn create_as_done_stamps_completion() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let task = TaskService::new(&mut store)
        .create_task(TaskInput::new("Already shipped").with_status(TaskStatus::Done))
        .unwrap();

    assert_eq!(task.status, TaskStatus::Done);
    assert!(task.completed_at.is_some());
    assert_completion_consistent(&task);
}

#[test]
fn done_todo_done_cycle_restamps_completion_and_keeps_priority() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut service = TaskService::new(&mut store);
    let ship = service
        .create_task(
            TaskInput::new("Ship")
                .with_priority(TaskPriority::High)
                .with_tags(["release"]),
        )
        .unwrap();
    assert_eq!(ship.priority, TaskPriority::High);
    assert_completion_consistent(&ship);

    let done = service
        .update_task(
            ship.id,
            TaskInput::new("Ship")
                .with_status(TaskStatus::Done)
                .with_tags(["release"]),
        )
        .unwrap();
    let first_completion = done.completed_at.unwrap();
    assert_eq!(done.priority, TaskPriority::High, "priority is kept when omitted");
    assert_completion_consistent(&done);

    let still_done = service
        .update_task(
            ship.id,
            TaskInput::new("Ship it").with_status(TaskStatus::Done),
        )
        .unwrap();
    assert_eq!(still_done.completed_at, Some(first_completion));

    let reopened = service
        .update_task(ship.id, TaskInput::new("Ship").with_status(TaskStatus::Todo))
        .unwrap();
    assert_eq!(reopened.status, TaskStatus::Todo);
    assert_eq!(reopened.completed_at, None);
    assert_completion_consistent(&reopened);

    sleep(Duration::from_millis(5));
    let redone = service
        .update_task(ship.id, TaskInput::new("Ship").with_status(TaskStatus::Done))
        .unwrap();
    let second_completion = redone.completed_at.unwrap();
    assert!(second_completion > first_completion);
    assert_completion_consistent(&redone);
    assert_eq!(redone.created_at, ship.created_at);
}

#[test]
fn update_without_status_leaves_lifecycle_untouched() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut service = TaskService::new(&mut store);
    let task = service
        .create_task(TaskInput::new("Review").with_status(TaskStatus::InProgress))
        .unwrap();

    let updated = service
        .update_task(
            task.id,
            TaskInput::new("Review PR").with_priority(TaskPriority::Low),
        )
        .unwrap();
    assert_eq!(updated.title, "Review PR");
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.priority, TaskPriority::Low);
    assert_eq!(updated.completed_at, None);
}

#[test]
fn update_replaces_tag_set_with_subset() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut service = TaskService::new(&mut store);
    let task = service
        .create_task(TaskInput::new("Plan").with_tags(["a", "b", "c"]))
        .unwrap();
    assert_eq!(task.tags, vec!["a", "b", "c"]);

    let updated = service
        .update_task(task.id, TaskInput::new("Plan").with_tags(["c", "a"]))
        .unwrap();
    assert_eq!(updated.tags, vec!["a", "c"]);

    let cleared = service
        .update_task(task.id, TaskInput::new("Plan"))
        .unwrap();
    assert!(cleared.tags.is_empty());
    drop(service);
    assert_eq!(count(&store, "task_tags"), 0);
    assert_eq!(count(&store, "tags"), 3);
}

#[test]
fn duplicate_tag_names_in_one_input_link_once() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let task = TaskService::new(&mut store)
        .create_task(TaskInput::new("Dedup").with_tags(["x", "x", "y"]))
        .unwrap();
    assert_eq!(task.tags, vec!["x", "y"]);
    assert_eq!(count(&store, "tags"), 2);
    assert_eq!(count(&store, "task_tags"), 2);
}

#[test]
fn task_links_note_and_category() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let category = TaxonomyService::new(&mut store)
        .create_category("Work")
        .unwrap();
    let note = NoteService::new(&mut store)
        .create_note(NoteInput::new("Meeting notes"))
        .unwrap();

    let task = TaskService::new(&mut store)
        .create_task(
            TaskInput::new("Send recap")
                .with_category(category.id)
                .with_note(note.id),
        )
        .unwrap();
    assert_eq!(task.category_id, Some(category.id));
    assert_eq!(task.category_name.as_deref(), Some("Work"));
    assert_eq!(task.note_id, Some(note.id));
    assert_eq!(task.note_title.as_deref(), Some("Meeting notes"));

    let detached = TaskService::new(&mut store)
        .update_task(task.id, TaskInput::new("Send recap"))
        .unwrap();
    assert_eq!(detached.note_id, None);
    assert_eq!(detached.category_id, None);
}

#[test]
fn missing_references_fail_with_not_found() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut service = TaskService::new(&mut store);

    let err = service
        .create_task(TaskInput::new("x").with_note(77).with_tags(["t"]))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: EntityKind::Note,
            id: 77
        }
    ));

    let err = service
        .create_task(TaskInput::new("x").with_category(5))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: EntityKind::Category,
            id: 5
        }
    ));
    drop(service);
    assert_eq!(count(&store, "tasks"), 0);
    assert_eq!(count(&store, "tags"), 0);
}

#[test]
fn missing_task_fails_get_update_and_delete() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut service = TaskService::new(&mut store);
    service.create_task(TaskInput::new("keep")).unwrap();

    for err in [
        service.get_task(42).unwrap_err(),
        service
            .update_task(42, TaskInput::new("x").with_status(TaskStatus::Done))
            .unwrap_err(),
        service.delete_task(42).unwrap_err(),
    ] {
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: EntityKind::Task,
                id: 42
            }
        ));
    }
    drop(service);
    assert_eq!(count(&store, "tasks"), 1);
}

#[test]
fn delete_task_removes_row_and_links() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut service = TaskService::new(&mut store);
    let task = service
        .create_task(TaskInput::new("gone").with_tags(["keep-me"]))
        .unwrap();
    service.delete_task(task.id).unwrap();
    assert!(matches!(
        service.get_task(task.id),
        Err(ServiceError::NotFound { .. })
    ));
    drop(service);
    assert_eq!(count(&store, "task_tags"), 0);
    assert_eq!(count(&store, "tags"), 1);
}

#[test]
fn tasks_list_defaults_to_due_date_asc_and_filters_by_status() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut service = TaskService::new(&mut store);
    let late = service
        .create_task(TaskInput::new("late").with_due_date(3_000))
        .unwrap();
    let early = service
        .create_task(
            TaskInput::new("early")
                .with_due_date(1_000)
                .with_status(TaskStatus::Done),
        )
        .unwrap();
    let middle = service
        .create_task(TaskInput::new("middle").with_due_date(2_000))
        .unwrap();

    let all = service
        .list_tasks(TaskFilter::default(), PageRequest::default())
        .unwrap();
    let ids: Vec<_> = all.items.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![early.id, middle.id, late.id]);

    let todo = service
        .list_tasks(
            TaskFilter::new(Some(TaskStatus::Todo), None, None, None),
            PageRequest::default(),
        )
        .unwrap();
    let ids: Vec<_> = todo.items.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![middle.id, late.id]);
    assert_eq!(todo.total_elements, 2);
}

#[test]
fn tasks_sort_by_priority_rank_not_text() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut service = TaskService::new(&mut store);
    let medium = service.create_task(TaskInput::new("m")).unwrap();
    let high = service
        .create_task(TaskInput::new("h").with_priority(TaskPriority::High))
        .unwrap();
    let low = service
        .create_task(TaskInput::new("l").with_priority(TaskPriority::Low))
        .unwrap();

    let page = service
        .list_tasks(
            TaskFilter::default(),
            PageRequest::default().sorted_by(Sort::desc(TaskSortField::Priority)),
        )
        .unwrap();
    let ids: Vec<_> = page.items.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![high.id, medium.id, low.id]);
}

#[test]
fn tasks_filter_by_note_category_and_tag_together() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let category = TaxonomyService::new(&mut store)
        .create_category("Ops")
        .unwrap();
    let note = NoteService::new(&mut store)
        .create_note(NoteInput::new("incident"))
        .unwrap();
    let mut service = TaskService::new(&mut store);
    let target = service
        .create_task(
            TaskInput::new("postmortem")
                .with_category(category.id)
                .with_note(note.id)
                .with_tags(["P1"]),
        )
        .unwrap();
    service
        .create_task(
            TaskInput::new("unrelated")
                .with_category(category.id)
                .with_tags(["P1"]),
        )
        .unwrap();
    service
        .create_task(TaskInput::new("other note").with_note(note.id))
        .unwrap();

    let page = service
        .list_tasks(
            TaskFilter::new(
                Some(TaskStatus::Todo),
                Some(category.id),
                Some("P1".to_string()),
                Some(note.id),
            ),
            PageRequest::default(),
        )
        .unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.items[0].id, target.id);
}
