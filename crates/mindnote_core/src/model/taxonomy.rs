//! Category and tag reference data.
//!
//! Both kinds are shared by notes and tasks and have lifecycles independent
//! of the records that point at them.

use super::RecordId;
use serde::{Deserialize, Serialize};

/// Single-choice classification for a note or task.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    /// Unique, non-blank.
    pub name: String,
}

/// Free-form label. The name is unique and compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: RecordId,
    pub name: String,
}
