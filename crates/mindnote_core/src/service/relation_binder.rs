//! Existence-checked binding of category and note references.
//!
//! An absent id clears the association. A present id must point at an
//! existing record, otherwise the whole enclosing operation aborts with
//! `NotFound` before anything is written.

use super::error::{ServiceError, ServiceResult};
use crate::model::note::NoteRef;
use crate::model::taxonomy::Category;
use crate::model::{EntityKind, RecordId};
use crate::repo::note_repo::NoteRepository;
use crate::repo::taxonomy_repo::CategoryRepository;

pub fn bind_category(
    categories: &dyn CategoryRepository,
    category_id: Option<RecordId>,
) -> ServiceResult<Option<Category>> {
    let Some(id) = category_id else {
        return Ok(None);
    };
    categories
        .get_category(id)?
        .map(Some)
        .ok_or(ServiceError::not_found(EntityKind::Category, id))
}

pub fn bind_note(
    notes: &dyn NoteRepository,
    note_id: Option<RecordId>,
) -> ServiceResult<Option<NoteRef>> {
    let Some(id) = note_id else {
        return Ok(None);
    };
    notes
        .get_note_ref(id)?
        .map(Some)
        .ok_or(ServiceError::not_found(EntityKind::Note, id))
}
