//! Find-or-create resolution of tag names.
//!
//! # Invariants
//! - One name always resolves to one tag identity.
//! - Existing tags are returned without any write.
//! - A uniqueness conflict on insert means another writer created the tag
//!   first; it is recovered by re-reading once and never surfaced.

use super::error::{ServiceError, ServiceResult};
use crate::model::taxonomy::Tag;
use crate::model::validation::require_non_blank;
use crate::model::RecordId;
use crate::repo::taxonomy_repo::TagRepository;
use crate::repo::RepoError;
use log::warn;
use std::collections::BTreeSet;

/// Resolves every distinct name to a tag, creating missing ones.
///
/// Names are matched exactly (case-sensitive). The result is ordered by
/// name and contains no duplicates; an empty input yields an empty result.
///
/// # Errors
/// - `Validation` on field `tags` for a blank name, before any write.
pub fn resolve_tags(tags: &dyn TagRepository, names: &[String]) -> ServiceResult<Vec<Tag>> {
    let mut unique = BTreeSet::new();
    for name in names {
        require_non_blank("tags", name)?;
        unique.insert(name.as_str());
    }

    unique
        .into_iter()
        .map(|name| find_or_create(tags, name))
        .collect()
}

/// Ids of resolved tags, in the same order.
pub fn tag_ids(tags: &[Tag]) -> Vec<RecordId> {
    tags.iter().map(|tag| tag.id).collect()
}

fn find_or_create(tags: &dyn TagRepository, name: &str) -> ServiceResult<Tag> {
    if let Some(tag) = tags.find_tag_by_name(name)? {
        return Ok(tag);
    }

    match tags.insert_tag(name) {
        Ok(tag) => Ok(tag),
        Err(RepoError::Conflict { .. }) => {
            warn!("event=tag_resolve module=tag_resolver status=retry reason=unique_conflict");
            tags.find_tag_by_name(name)?.ok_or(ServiceError::InconsistentState(
                "tag conflict reported but no tag found on re-read",
            ))
        }
        Err(err) => Err(err.into()),
    }
}
