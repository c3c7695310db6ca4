//! Note use-case service.
//!
//! # Responsibility
//! - Provide note create/get/update/delete/list APIs.
//! - Resolve category and tags before writing the note row.
//!
//! # Invariants
//! - Update is a full replacement of title, content, category and the
//!   whole tag set.
//! - Listing with no criteria issues a plain paged scan; any criterion goes
//!   through the filtered query. Default order is `updatedAt DESC`.

use super::error::{ServiceError, ServiceResult};
use super::log_failure;
use super::relation_binder::bind_category;
use super::tag_resolver::{resolve_tags, tag_ids};
use crate::model::note::{NoteFilter, NoteInput, NoteRecord};
use crate::model::now_epoch_ms;
use crate::model::page::{NoteSortField, Page, PageRequest, Sort};
use crate::model::{EntityKind, RecordId};
use crate::repo::note_repo::NoteRow;
use crate::repo::store::{Repositories, Store};
use log::{debug, info};
use std::time::Instant;

const MODULE: &str = "note_service";

/// Note service facade over a transactional store.
pub struct NoteService<S: Store> {
    store: S,
}

impl<S: Store> NoteService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists one page of notes matching all present filter criteria.
    pub fn list_notes(
        &mut self,
        filter: NoteFilter,
        page: PageRequest<NoteSortField>,
    ) -> ServiceResult<Page<NoteRecord>> {
        let started_at = Instant::now();
        let spec = page.resolve(Sort::desc(NoteSortField::UpdatedAt))?;
        let result = self.store.read(|repos| -> ServiceResult<_> {
            let notes = repos.notes();
            let page = if filter.is_empty() {
                notes.scan_notes(&spec)?
            } else {
                notes.find_notes_by_filters(&filter, &spec)?
            };
            Ok(page)
        });

        match &result {
            Ok(page) => debug!(
                "event=note_list module={MODULE} status=ok filtered={} page={} returned={} total={} duration_ms={}",
                !filter.is_empty(),
                page.page,
                page.items.len(),
                page.total_elements,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_list", MODULE, err, started_at),
        }
        result
    }

    pub fn get_note(&mut self, id: RecordId) -> ServiceResult<NoteRecord> {
        let started_at = Instant::now();
        let result = self.store.read(|repos| load_note(repos, id));
        if let Err(err) = &result {
            log_failure("note_get", MODULE, err, started_at);
        }
        result
    }

    /// Creates one note with its category and find-or-create tags.
    pub fn create_note(&mut self, input: NoteInput) -> ServiceResult<NoteRecord> {
        let started_at = Instant::now();
        let result = input.validate().map_err(ServiceError::from).and_then(|()| {
            self.store.write(|repos| {
                let category = bind_category(repos.categories(), input.category_id)?;
                let tags = resolve_tags(repos.tags(), &input.tags)?;
                let now = now_epoch_ms();
                let id = repos.notes().insert_note(&NoteRow {
                    title: &input.title,
                    content: input.content.as_deref(),
                    category_id: category.map(|category| category.id),
                    created_at: now,
                    updated_at: now,
                })?;
                repos.notes().replace_note_tags(id, &tag_ids(&tags))?;
                read_back(repos, id, "created note not found in read-back")
            })
        });

        match &result {
            Ok(note) => info!(
                "event=note_create module={MODULE} status=ok note_id={} tag_count={} duration_ms={}",
                note.id,
                note.tags.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_create", MODULE, err, started_at),
        }
        result
    }

    /// Replaces every caller-visible field of an existing note.
    ///
    /// Tags not named in `input` are unlinked even if present before.
    pub fn update_note(&mut self, id: RecordId, input: NoteInput) -> ServiceResult<NoteRecord> {
        let started_at = Instant::now();
        let result = input.validate().map_err(ServiceError::from).and_then(|()| {
            self.store.write(|repos| {
                let existing = load_note(repos, id)?;
                let category = bind_category(repos.categories(), input.category_id)?;
                let tags = resolve_tags(repos.tags(), &input.tags)?;
                repos.notes().update_note(
                    id,
                    &NoteRow {
                        title: &input.title,
                        content: input.content.as_deref(),
                        category_id: category.map(|category| category.id),
                        created_at: existing.created_at,
                        updated_at: now_epoch_ms(),
                    },
                )?;
                repos.notes().replace_note_tags(id, &tag_ids(&tags))?;
                read_back(repos, id, "updated note not found in read-back")
            })
        });

        match &result {
            Ok(note) => info!(
                "event=note_update module={MODULE} status=ok note_id={} tag_count={} duration_ms={}",
                note.id,
                note.tags.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_update", MODULE, err, started_at),
        }
        result
    }

    /// Deletes a note and its tag links. Tasks linked to it are detached.
    pub fn delete_note(&mut self, id: RecordId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self
            .store
            .write(|repos| -> ServiceResult<()> { Ok(repos.notes().delete_note(id)?) });

        match &result {
            Ok(()) => info!(
                "event=note_delete module={MODULE} status=ok note_id={id} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_delete", MODULE, err, started_at),
        }
        result
    }
}

fn load_note(repos: &dyn Repositories, id: RecordId) -> ServiceResult<NoteRecord> {
    repos
        .notes()
        .get_note(id)?
        .ok_or(ServiceError::not_found(EntityKind::Note, id))
}

fn read_back(
    repos: &dyn Repositories,
    id: RecordId,
    details: &'static str,
) -> ServiceResult<NoteRecord> {
    repos
        .notes()
        .get_note(id)?
        .ok_or(ServiceError::InconsistentState(details))
}
