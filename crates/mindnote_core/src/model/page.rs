//! Page requests, sort allow-lists and the page envelope.
//!
//! # Invariants
//! - Sort fields are restricted to a fixed allow-list per entity.
//! - Effective page size is always in `1..=MAX_PAGE_SIZE`.

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ValidationError::new(
                "sort",
                format!("unsupported direction `{other}`; expected asc|desc"),
            )),
        }
    }
}

/// Sortable note columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteSortField {
    Title,
    CreatedAt,
    UpdatedAt,
}

impl FromStr for NoteSortField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "title" => Ok(Self::Title),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            "updatedAt" | "updated_at" => Ok(Self::UpdatedAt),
            other => Err(unsupported_field(other, "title|createdAt|updatedAt")),
        }
    }
}

/// Sortable task columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskSortField {
    DueDate,
    CreatedAt,
    UpdatedAt,
    Priority,
    Status,
}

impl FromStr for TaskSortField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "dueDate" | "due_date" => Ok(Self::DueDate),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            "updatedAt" | "updated_at" => Ok(Self::UpdatedAt),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            other => Err(unsupported_field(
                other,
                "dueDate|createdAt|updatedAt|priority|status",
            )),
        }
    }
}

fn unsupported_field(field: &str, allowed: &str) -> ValidationError {
    ValidationError::new(
        "sort",
        format!("unsupported sort field `{field}`; expected {allowed}"),
    )
}

/// One sort key. Ties are always broken by ascending id downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sort<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F> Sort<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Parses `field` or `field,direction`; direction defaults to ascending.
impl<F> FromStr for Sort<F>
where
    F: FromStr<Err = ValidationError>,
{
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match value.split_once(',') {
            Some((field, direction)) => (field, direction.parse()?),
            None => (value, SortDirection::Asc),
        };
        Ok(Self {
            field: field.parse()?,
            direction,
        })
    }
}

/// Caller page request. Unset size/sort fall back to per-entity defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<F> {
    /// Zero-based page index.
    pub page: u32,
    pub size: Option<u32>,
    pub sort: Option<Sort<F>>,
}

impl<F> Default for PageRequest<F> {
    fn default() -> Self {
        Self {
            page: 0,
            size: None,
            sort: None,
        }
    }
}

impl<F> PageRequest<F> {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: Some(size),
            sort: None,
        }
    }

    pub fn sorted_by(mut self, sort: Sort<F>) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Applies defaults and bounds, producing the effective page spec.
    ///
    /// # Errors
    /// - `size == 0` is rejected on field `size`.
    pub fn resolve(self, default_sort: Sort<F>) -> Result<PageSpec<F>, ValidationError> {
        let size = match self.size {
            Some(0) => return Err(ValidationError::new("size", "must be positive")),
            Some(size) => size.min(MAX_PAGE_SIZE),
            None => DEFAULT_PAGE_SIZE,
        };
        Ok(PageSpec {
            page: self.page,
            size,
            sort: self.sort.unwrap_or(default_sort),
        })
    }
}

/// Effective, bounded page request handed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec<F> {
    pub page: u32,
    pub size: u32,
    pub sort: Sort<F>,
}

impl<F> PageSpec<F> {
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// One slice of an ordered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, size: u32, total_elements: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(u64::from(size))
        };
        Self {
            items,
            page,
            size,
            total_elements,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
