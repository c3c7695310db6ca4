//! Core domain logic for MindNote notes and tasks.
//! This crate is the single source of truth for relationship and lifecycle
//! invariants: tag find-or-create, reference binding, filtered paging and
//! task completion tracking.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{NoteFilter, NoteInput, NoteRecord, NoteRef};
pub use model::page::{
    NoteSortField, Page, PageRequest, Sort, SortDirection, TaskSortField, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
pub use model::task::{
    next_completed_at, TaskFilter, TaskInput, TaskPriority, TaskRecord, TaskStatus,
};
pub use model::taxonomy::{Category, Tag};
pub use model::validation::ValidationError;
pub use model::{EntityKind, RecordId};
pub use repo::store::{Repositories, SqliteStore, Store};
pub use repo::{RepoError, RepoResult};
pub use service::error::{ServiceError, ServiceResult};
pub use service::note_service::NoteService;
pub use service::task_service::TaskService;
pub use service::taxonomy_service::TaxonomyService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
