//! Task use-case service.
//!
//! # Responsibility
//! - Provide task create/get/update/delete/list APIs.
//! - Resolve category, tags and the optional originating note link.
//! - Drive `completed_at` from status through `next_completed_at`.
//!
//! # Invariants
//! - After every create/update `completed_at.is_some() == (status == Done)`.
//! - Update fully replaces title/description/due date/category/tags/note
//!   link. Priority is the one exception and is kept when not supplied.
//! - Status is only re-evaluated when the update supplies one.

use super::error::{ServiceError, ServiceResult};
use super::log_failure;
use super::relation_binder::{bind_category, bind_note};
use super::tag_resolver::{resolve_tags, tag_ids};
use crate::model::page::{Page, PageRequest, Sort, TaskSortField};
use crate::model::task::{next_completed_at, TaskFilter, TaskInput, TaskRecord};
use crate::model::{now_epoch_ms, EntityKind, RecordId};
use crate::repo::store::{Repositories, Store};
use crate::repo::task_repo::TaskRow;
use log::{debug, info};
use std::time::Instant;

const MODULE: &str = "task_service";

/// Task service facade over a transactional store.
pub struct TaskService<S: Store> {
    store: S,
}

impl<S: Store> TaskService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists one page of tasks. Default order is `dueDate ASC`.
    pub fn list_tasks(
        &mut self,
        filter: TaskFilter,
        page: PageRequest<TaskSortField>,
    ) -> ServiceResult<Page<TaskRecord>> {
        let started_at = Instant::now();
        let spec = page.resolve(Sort::asc(TaskSortField::DueDate))?;
        let result = self.store.read(|repos| -> ServiceResult<_> {
            let tasks = repos.tasks();
            let page = if filter.is_empty() {
                tasks.scan_tasks(&spec)?
            } else {
                tasks.find_tasks_by_filters(&filter, &spec)?
            };
            Ok(page)
        });

        match &result {
            Ok(page) => debug!(
                "event=task_list module={MODULE} status=ok filtered={} page={} returned={} total={} duration_ms={}",
                !filter.is_empty(),
                page.page,
                page.items.len(),
                page.total_elements,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("task_list", MODULE, err, started_at),
        }
        result
    }

    pub fn get_task(&mut self, id: RecordId) -> ServiceResult<TaskRecord> {
        let started_at = Instant::now();
        let result = self.store.read(|repos| load_task(repos, id));
        if let Err(err) = &result {
            log_failure("task_get", MODULE, err, started_at);
        }
        result
    }

    /// Creates a task. Status defaults to `Todo`, priority to `Medium`.
    pub fn create_task(&mut self, input: TaskInput) -> ServiceResult<TaskRecord> {
        let started_at = Instant::now();
        let result = input.validate().map_err(ServiceError::from).and_then(|()| {
            self.store.write(|repos| {
                let category = bind_category(repos.categories(), input.category_id)?;
                let note = bind_note(repos.notes(), input.note_id)?;
                let tags = resolve_tags(repos.tags(), &input.tags)?;
                let now = now_epoch_ms();
                let status = input.status.unwrap_or_default();
                let id = repos.tasks().insert_task(&TaskRow {
                    title: &input.title,
                    description: input.description.as_deref(),
                    status,
                    priority: input.priority.unwrap_or_default(),
                    due_date: input.due_date,
                    completed_at: next_completed_at(None, status, now),
                    category_id: category.map(|category| category.id),
                    note_id: note.map(|note| note.id),
                    created_at: now,
                    updated_at: now,
                })?;
                repos.tasks().replace_task_tags(id, &tag_ids(&tags))?;
                read_back(repos, id, "created task not found in read-back")
            })
        });

        match &result {
            Ok(task) => info!(
                "event=task_create module={MODULE} status=ok task_id={} task_status={:?} tag_count={} duration_ms={}",
                task.id,
                task.status,
                task.tags.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("task_create", MODULE, err, started_at),
        }
        result
    }

    /// Applies a task update, including the status transition.
    pub fn update_task(&mut self, id: RecordId, input: TaskInput) -> ServiceResult<TaskRecord> {
        let started_at = Instant::now();
        let result = input.validate().map_err(ServiceError::from).and_then(|()| {
            self.store.write(|repos| {
                let existing = load_task(repos, id)?;
                let category = bind_category(repos.categories(), input.category_id)?;
                let note = bind_note(repos.notes(), input.note_id)?;
                let tags = resolve_tags(repos.tags(), &input.tags)?;
                let now = now_epoch_ms();
                let (status, completed_at) = match input.status {
                    Some(status) => (status, next_completed_at(existing.completed_at, status, now)),
                    None => (existing.status, existing.completed_at),
                };
                repos.tasks().update_task(
                    id,
                    &TaskRow {
                        title: &input.title,
                        description: input.description.as_deref(),
                        status,
                        priority: input.priority.unwrap_or(existing.priority),
                        due_date: input.due_date,
                        completed_at,
                        category_id: category.map(|category| category.id),
                        note_id: note.map(|note| note.id),
                        created_at: existing.created_at,
                        updated_at: now,
                    },
                )?;
                repos.tasks().replace_task_tags(id, &tag_ids(&tags))?;
                read_back(repos, id, "updated task not found in read-back")
            })
        });

        match &result {
            Ok(task) => info!(
                "event=task_update module={MODULE} status=ok task_id={} task_status={:?} tag_count={} duration_ms={}",
                task.id,
                task.status,
                task.tags.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("task_update", MODULE, err, started_at),
        }
        result
    }

    /// Deletes a task after an explicit existence check.
    pub fn delete_task(&mut self, id: RecordId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self.store.write(|repos| -> ServiceResult<()> {
            if !repos.tasks().task_exists(id)? {
                return Err(ServiceError::not_found(EntityKind::Task, id));
            }
            repos.tasks().delete_task(id)?;
            Ok(())
        });

        match &result {
            Ok(()) => info!(
                "event=task_delete module={MODULE} status=ok task_id={id} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("task_delete", MODULE, err, started_at),
        }
        result
    }
}

fn load_task(repos: &dyn Repositories, id: RecordId) -> ServiceResult<TaskRecord> {
    repos
        .tasks()
        .get_task(id)?
        .ok_or(ServiceError::not_found(EntityKind::Task, id))
}

fn read_back(
    repos: &dyn Repositories,
    id: RecordId,
    details: &'static str,
) -> ServiceResult<TaskRecord> {
    repos
        .tasks()
        .get_task(id)?
        .ok_or(ServiceError::InconsistentState(details))
}
