//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - Status/priority persist as `TODO|IN_PROGRESS|DONE` and
//!   `LOW|MEDIUM|HIGH`; any other stored text is rejected on read.
//! - The schema CHECK mirrors the completion rule, so a row violating
//!   `completed_at <=> DONE` can never be written.

use super::query::{fetch_page, task_filter_sql, FilterSql};
use super::taxonomy_repo::{load_tag_names, replace_tag_links, TagLink};
use super::{RepoError, RepoResult};
use crate::model::page::{Page, PageSpec, TaskSortField};
use crate::model::task::{TaskFilter, TaskPriority, TaskRecord, TaskStatus};
use crate::model::{EntityKind, RecordId};
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    tasks.id AS id,
    tasks.title AS title,
    tasks.description AS description,
    tasks.status AS status,
    tasks.priority AS priority,
    tasks.due_date AS due_date,
    tasks.completed_at AS completed_at,
    tasks.category_id AS category_id,
    categories.name AS category_name,
    tasks.note_id AS note_id,
    notes.title AS note_title,
    tasks.created_at AS created_at,
    tasks.updated_at AS updated_at
FROM tasks
LEFT JOIN categories ON categories.id = tasks.category_id
LEFT JOIN notes ON notes.id = tasks.note_id";

/// Column values written on task insert/update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRow<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<i64>,
    pub completed_at: Option<i64>,
    pub category_id: Option<RecordId>,
    pub note_id: Option<RecordId>,
    /// Ignored by `update_task`.
    pub created_at: i64,
    pub updated_at: i64,
}

/// Repository interface for task operations.
pub trait TaskRepository {
    fn insert_task(&self, row: &TaskRow<'_>) -> RepoResult<RecordId>;
    fn update_task(&self, id: RecordId, row: &TaskRow<'_>) -> RepoResult<()>;
    /// Replaces the whole tag link set of one task.
    fn replace_task_tags(&self, id: RecordId, tag_ids: &[RecordId]) -> RepoResult<()>;
    fn get_task(&self, id: RecordId) -> RepoResult<Option<TaskRecord>>;
    fn task_exists(&self, id: RecordId) -> RepoResult<bool>;
    fn delete_task(&self, id: RecordId) -> RepoResult<()>;
    /// Plain paged scan with no filter predicates.
    fn scan_tasks(&self, page: &PageSpec<TaskSortField>) -> RepoResult<Page<TaskRecord>>;
    fn find_tasks_by_filters(
        &self,
        filter: &TaskFilter,
        page: &PageSpec<TaskSortField>,
    ) -> RepoResult<Page<TaskRecord>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn fetch(
        &self,
        filter: FilterSql,
        page: &PageSpec<TaskSortField>,
    ) -> RepoResult<Page<TaskRecord>> {
        fetch_page(self.conn, "tasks", TASK_SELECT_SQL, filter, page, |row| {
            parse_task_row(self.conn, row)
        })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, row: &TaskRow<'_>) -> RepoResult<RecordId> {
        self.conn.execute(
            "INSERT INTO tasks (
                title,
                description,
                status,
                priority,
                due_date,
                completed_at,
                category_id,
                note_id,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                row.title,
                row.description,
                status_to_db(row.status),
                priority_to_db(row.priority),
                row.due_date,
                row.completed_at,
                row.category_id,
                row.note_id,
                row.created_at,
                row.updated_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_task(&self, id: RecordId, row: &TaskRow<'_>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?2,
                description = ?3,
                status = ?4,
                priority = ?5,
                due_date = ?6,
                completed_at = ?7,
                category_id = ?8,
                note_id = ?9,
                updated_at = ?10
             WHERE id = ?1;",
            params![
                id,
                row.title,
                row.description,
                status_to_db(row.status),
                priority_to_db(row.priority),
                row.due_date,
                row.completed_at,
                row.category_id,
                row.note_id,
                row.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Task,
                id,
            });
        }
        Ok(())
    }

    fn replace_task_tags(&self, id: RecordId, tag_ids: &[RecordId]) -> RepoResult<()> {
        replace_tag_links(self.conn, TagLink::Task, id, tag_ids)
    }

    fn get_task(&self, id: RecordId) -> RepoResult<Option<TaskRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE tasks.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_task_row(self.conn, row)?)),
            None => Ok(None),
        }
    }

    fn task_exists(&self, id: RecordId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_task(&self, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Task,
                id,
            });
        }
        Ok(())
    }

    fn scan_tasks(&self, page: &PageSpec<TaskSortField>) -> RepoResult<Page<TaskRecord>> {
        self.fetch(FilterSql::unfiltered(), page)
    }

    fn find_tasks_by_filters(
        &self,
        filter: &TaskFilter,
        page: &PageSpec<TaskSortField>,
    ) -> RepoResult<Page<TaskRecord>> {
        self.fetch(task_filter_sql(filter), page)
    }
}

fn parse_task_row(conn: &Connection, row: &Row<'_>) -> RepoResult<TaskRecord> {
    let id: RecordId = row.get("id")?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid task priority `{priority_text}` in tasks.priority"
        ))
    })?;

    Ok(TaskRecord {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        priority,
        due_date: row.get("due_date")?,
        completed_at: row.get("completed_at")?,
        category_id: row.get("category_id")?,
        category_name: row.get("category_name")?,
        tags: load_tag_names(conn, TagLink::Task, id)?,
        note_id: row.get("note_id")?,
        note_title: row.get("note_title")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn status_to_db(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "TODO",
        TaskStatus::InProgress => "IN_PROGRESS",
        TaskStatus::Done => "DONE",
    }
}

fn parse_status(value: &str) -> Option<TaskStatus> {
    match value {
        "TODO" => Some(TaskStatus::Todo),
        "IN_PROGRESS" => Some(TaskStatus::InProgress),
        "DONE" => Some(TaskStatus::Done),
        _ => None,
    }
}

fn priority_to_db(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "LOW",
        TaskPriority::Medium => "MEDIUM",
        TaskPriority::High => "HIGH",
    }
}

fn parse_priority(value: &str) -> Option<TaskPriority> {
    match value {
        "LOW" => Some(TaskPriority::Low),
        "MEDIUM" => Some(TaskPriority::Medium),
        "HIGH" => Some(TaskPriority::High),
        _ => None,
    }
}
