//! Note records, caller input and list filters.

use super::validation::{require_non_blank, ValidationError};
use super::RecordId;
use serde::{Deserialize, Serialize};

/// Read model returned by note use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: RecordId,
    pub title: String,
    pub content: Option<String>,
    pub category_id: Option<RecordId>,
    pub category_name: Option<String>,
    /// Tag names sorted ascending.
    pub tags: Vec<String>,
    /// Set once on creation.
    pub created_at: i64,
    /// Refreshed on every mutation.
    pub updated_at: i64,
}

/// Minimal note projection used when a task links back to a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRef {
    pub id: RecordId,
    pub title: String,
}

/// Full-replacement input for note create/update.
///
/// Every field replaces the stored value on update: `None` clears, and the
/// tag list becomes the complete new tag set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    pub title: String,
    pub content: Option<String>,
    pub category_id: Option<RecordId>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NoteInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_category(mut self, category_id: RecordId) -> Self {
        self.category_id = Some(category_id);
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

/// Optional list criteria for notes. Absent criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Exact category name.
    pub category_name: Option<String>,
    /// Exact, case-sensitive tag name.
    pub tag_name: Option<String>,
}

impl NoteFilter {
    /// Builds a filter, treating blank strings as absent criteria.
    pub fn new(category_name: Option<String>, tag_name: Option<String>) -> Self {
        Self {
            category_name: non_blank(category_name),
            tag_name: non_blank(tag_name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category_name().is_none() && self.tag_name().is_none()
    }

    /// Category criterion, ignoring a blank value.
    pub fn category_name(&self) -> Option<&str> {
        present(self.category_name.as_deref())
    }

    /// Tag criterion, ignoring a blank value.
    pub fn tag_name(&self) -> Option<&str> {
        present(self.tag_name.as_deref())
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{NoteFilter, NoteInput};

    #[test]
    fn blank_filter_values_become_wildcards() {
        let filter = NoteFilter::new(Some("  ".to_string()), Some(String::new()));
        assert!(filter.is_empty());

        let filter = NoteFilter::new(Some("Work".to_string()), None);
        assert!(!filter.is_empty());
    }

    #[test]
    fn blank_literal_fields_are_ignored() {
        let filter = NoteFilter {
            category_name: Some(" ".to_string()),
            tag_name: Some("Q3".to_string()),
        };
        assert!(!filter.is_empty());
        assert_eq!(filter.category_name(), None);
        assert_eq!(filter.tag_name(), Some("Q3"));
    }

    #[test]
    fn input_without_title_fails_validation() {
        let err = NoteInput::new("").validate().unwrap_err();
        assert_eq!(err.field, "title");
    }
}
