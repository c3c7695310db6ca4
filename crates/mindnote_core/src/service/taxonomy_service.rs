//! Category and tag reference-data service.

use super::error::{ServiceError, ServiceResult};
use super::log_failure;
use crate::model::taxonomy::{Category, Tag};
use crate::model::validation::{require_non_blank, ValidationError};
use crate::model::{EntityKind, RecordId};
use crate::repo::store::Store;
use crate::repo::RepoError;
use log::info;
use std::time::Instant;

const MODULE: &str = "taxonomy_service";

/// Service over categories and tags.
pub struct TaxonomyService<S: Store> {
    store: S,
}

impl<S: Store> TaxonomyService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a category with a unique, non-blank name.
    ///
    /// # Errors
    /// - `Validation` on field `name` when blank or already taken.
    pub fn create_category(&mut self, name: &str) -> ServiceResult<Category> {
        let started_at = Instant::now();
        let result = require_non_blank("name", name)
            .map_err(ServiceError::from)
            .and_then(|()| {
                self.store.write(|repos| -> ServiceResult<Category> {
                    match repos.categories().create_category(name) {
                        Ok(category) => Ok(category),
                        Err(RepoError::Conflict { .. }) => Err(ValidationError::new(
                            "name",
                            "a category with this name already exists",
                        )
                        .into()),
                        Err(err) => Err(err.into()),
                    }
                })
            });

        match &result {
            Ok(category) => info!(
                "event=category_create module={MODULE} status=ok category_id={} duration_ms={}",
                category.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("category_create", MODULE, err, started_at),
        }
        result
    }

    pub fn get_category(&mut self, id: RecordId) -> ServiceResult<Category> {
        self.store.read(|repos| {
            repos
                .categories()
                .get_category(id)?
                .ok_or(ServiceError::not_found(EntityKind::Category, id))
        })
    }

    /// All categories ordered by name, then id.
    pub fn list_categories(&mut self) -> ServiceResult<Vec<Category>> {
        self.store
            .read(|repos| -> ServiceResult<_> { Ok(repos.categories().list_categories()?) })
    }

    /// Deletes a category; notes and tasks referencing it lose the reference.
    pub fn delete_category(&mut self, id: RecordId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self
            .store
            .write(|repos| -> ServiceResult<()> { Ok(repos.categories().delete_category(id)?) });

        match &result {
            Ok(()) => info!(
                "event=category_delete module={MODULE} status=ok category_id={id} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("category_delete", MODULE, err, started_at),
        }
        result
    }

    /// All tags ordered by name, then id.
    pub fn list_tags(&mut self) -> ServiceResult<Vec<Tag>> {
        self.store
            .read(|repos| -> ServiceResult<_> { Ok(repos.tags().list_tags()?) })
    }
}
