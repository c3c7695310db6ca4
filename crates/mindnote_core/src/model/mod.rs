//! Domain model for notes, tasks and their shared reference data.
//!
//! # Responsibility
//! - Define the plain data records returned to presentation layers.
//! - Define caller input shapes and their field-level validation.
//! - Keep pure domain rules (task completion) free of persistence.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned `RecordId`.
//! - Timestamps are Unix epoch milliseconds.

use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod note;
pub mod page;
pub mod task;
pub mod taxonomy;
pub mod validation;

/// Store-assigned identity shared by all record kinds.
pub type RecordId = i64;

/// Record kinds the core can reference by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Note,
    Task,
    Category,
    Tag,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Task => "task",
            Self::Category => "category",
            Self::Tag => "tag",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current wall-clock time in epoch milliseconds.
///
/// A clock set before 1970 yields `0` instead of failing the operation.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
