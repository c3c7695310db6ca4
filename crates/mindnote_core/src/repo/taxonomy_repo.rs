//! Category/tag repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist shared reference data (categories, tags).
//! - Own note/task tag link-row maintenance used by owner repositories.
//!
//! # Invariants
//! - Tag and category names are unique; a duplicate insert surfaces as
//!   `RepoError::Conflict`, never as a raw SQLite error.
//! - Tag names compare case-sensitively (binary collation).

use super::{is_unique_violation, RepoError, RepoResult};
use crate::model::taxonomy::{Category, Tag};
use crate::model::{EntityKind, RecordId};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for categories.
pub trait CategoryRepository {
    /// Inserts a category; duplicate names fail with `Conflict`.
    fn create_category(&self, name: &str) -> RepoResult<Category>;
    fn get_category(&self, id: RecordId) -> RepoResult<Option<Category>>;
    /// Returns all categories ordered by name, then id.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Deletes a category. Notes/tasks pointing at it are detached.
    fn delete_category(&self, id: RecordId) -> RepoResult<()>;
}

/// Repository interface for tags.
pub trait TagRepository {
    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>>;
    /// Inserts a tag; a name that already exists fails with `Conflict`.
    fn insert_tag(&self, name: &str) -> RepoResult<Tag>;
    /// Returns all tags ordered by name, then id.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
}

/// SQLite-backed category and tag repository.
pub struct SqliteTaxonomyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaxonomyRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteTaxonomyRepository<'_> {
    fn create_category(&self, name: &str) -> RepoResult<Category> {
        match self
            .conn
            .execute("INSERT INTO categories (name) VALUES (?1);", [name])
        {
            Ok(_) => Ok(Category {
                id: self.conn.last_insert_rowid(),
                name: name.to_string(),
            }),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Conflict {
                entity: EntityKind::Category,
                key: name.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn get_category(&self, id: RecordId) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?1;",
                [id],
                parse_category_row,
            )
            .optional()?;
        Ok(category)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY name ASC, id ASC;")?;
        let categories = stmt
            .query_map([], parse_category_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn delete_category(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Category,
                id,
            });
        }
        Ok(())
    }
}

impl TagRepository for SqliteTaxonomyRepository<'_> {
    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                "SELECT id, name FROM tags WHERE name = ?1;",
                [name],
                parse_tag_row,
            )
            .optional()?;
        Ok(tag)
    }

    fn insert_tag(&self, name: &str) -> RepoResult<Tag> {
        match self
            .conn
            .execute("INSERT INTO tags (name) VALUES (?1);", [name])
        {
            Ok(_) => Ok(Tag {
                id: self.conn.last_insert_rowid(),
                name: name.to_string(),
            }),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Conflict {
                entity: EntityKind::Tag,
                key: name.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tags ORDER BY name ASC, id ASC;")?;
        let tags = stmt
            .query_map([], parse_tag_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }
}

/// Link table owning the tag associations of one record kind.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TagLink {
    Note,
    Task,
}

impl TagLink {
    fn table(self) -> &'static str {
        match self {
            Self::Note => "note_tags",
            Self::Task => "task_tags",
        }
    }

    fn owner_column(self) -> &'static str {
        match self {
            Self::Note => "note_id",
            Self::Task => "task_id",
        }
    }
}

/// Loads tag names linked to one owner, sorted by name.
pub(crate) fn load_tag_names(
    conn: &Connection,
    link: TagLink,
    owner_id: RecordId,
) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT t.name
         FROM {table} l
         INNER JOIN tags t ON t.id = l.tag_id
         WHERE l.{owner} = ?1
         ORDER BY t.name ASC;",
        table = link.table(),
        owner = link.owner_column(),
    ))?;
    let names = stmt
        .query_map([owner_id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Replaces the full tag set of one owner with `tag_ids`.
pub(crate) fn replace_tag_links(
    conn: &Connection,
    link: TagLink,
    owner_id: RecordId,
    tag_ids: &[RecordId],
) -> RepoResult<()> {
    let table = link.table();
    let owner = link.owner_column();
    conn.execute(
        &format!("DELETE FROM {table} WHERE {owner} = ?1;"),
        [owner_id],
    )?;
    let mut insert = conn.prepare(&format!(
        "INSERT OR IGNORE INTO {table} ({owner}, tag_id) VALUES (?1, ?2);"
    ))?;
    for tag_id in tag_ids {
        insert.execute(params![owner_id, tag_id])?;
    }
    Ok(())
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn parse_tag_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
