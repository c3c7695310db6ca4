//! Task records, lifecycle enums and the completion state machine.
//!
//! # Invariants
//! - `completed_at` is `Some` if and only if `status == TaskStatus::Done`.
//! - `completed_at` is derived; callers never set it directly.

use super::note::{non_blank, present};
use super::validation::{require_non_blank, ValidationError};
use super::RecordId;
use serde::{Deserialize, Serialize};

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

/// Secondary ordering attribute for tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Computes `completed_at` after a status is applied.
///
/// Entering or staying in `Done` keeps an existing completion time and only
/// stamps `now` when none is recorded. Any other status clears it.
pub fn next_completed_at(current: Option<i64>, status: TaskStatus, now: i64) -> Option<i64> {
    match status {
        TaskStatus::Done => current.or(Some(now)),
        TaskStatus::Todo | TaskStatus::InProgress => None,
    }
}

/// Read model returned by task use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<i64>,
    pub completed_at: Option<i64>,
    pub category_id: Option<RecordId>,
    pub category_name: Option<String>,
    /// Tag names sorted ascending.
    pub tags: Vec<String>,
    pub note_id: Option<RecordId>,
    pub note_title: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for task create/update.
///
/// On update every field except `status` and `priority` is a full
/// replacement. `status: None` leaves status and completion untouched and
/// `priority: None` keeps the stored priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<i64>,
    pub category_id: Option<RecordId>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub note_id: Option<RecordId>,
}

impl TaskInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_due_date(mut self, due_date: i64) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_category(mut self, category_id: RecordId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_note(mut self, note_id: RecordId) -> Self {
        self.note_id = Some(note_id);
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("title", &self.title)
    }
}

/// Optional list criteria for tasks, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub category_id: Option<RecordId>,
    /// Exact, case-sensitive tag name.
    pub tag_name: Option<String>,
    pub note_id: Option<RecordId>,
}

impl TaskFilter {
    pub fn new(
        status: Option<TaskStatus>,
        category_id: Option<RecordId>,
        tag_name: Option<String>,
        note_id: Option<RecordId>,
    ) -> Self {
        Self {
            status,
            category_id,
            tag_name: non_blank(tag_name),
            note_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.category_id.is_none()
            && self.tag_name().is_none()
            && self.note_id.is_none()
    }

    /// Tag criterion, ignoring a blank value.
    pub fn tag_name(&self) -> Option<&str> {
        present(self.tag_name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::{next_completed_at, TaskFilter, TaskPriority, TaskStatus};

    #[test]
    fn done_stamps_completion_when_unset() {
        assert_eq!(next_completed_at(None, TaskStatus::Done, 42), Some(42));
    }

    #[test]
    fn done_to_done_keeps_original_completion() {
        assert_eq!(next_completed_at(Some(7), TaskStatus::Done, 42), Some(7));
    }

    #[test]
    fn leaving_done_clears_completion() {
        assert_eq!(next_completed_at(Some(7), TaskStatus::Todo, 42), None);
        assert_eq!(next_completed_at(Some(7), TaskStatus::InProgress, 42), None);
        assert_eq!(next_completed_at(None, TaskStatus::InProgress, 42), None);
    }

    #[test]
    fn done_todo_done_restamps_with_new_time() {
        let first = next_completed_at(None, TaskStatus::Done, 100);
        let cleared = next_completed_at(first, TaskStatus::Todo, 200);
        let second = next_completed_at(cleared, TaskStatus::Done, 300);
        assert_eq!(second, Some(300));
    }

    #[test]
    fn defaults_are_todo_and_medium() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn enums_serialize_in_screaming_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(serde_json::to_string(&TaskPriority::High).unwrap(), "\"HIGH\"");
    }

    #[test]
    fn filter_with_blank_tag_is_empty() {
        let filter = TaskFilter::new(None, None, Some(" ".to_string()), None);
        assert!(filter.is_empty());

        let filter = TaskFilter {
            tag_name: Some("\t".to_string()),
            ..TaskFilter::default()
        };
        assert!(filter.is_empty());
        assert_eq!(filter.tag_name(), None);
    }
}
