//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist note rows and their tag link rows.
//! - Serve unfiltered scans and filtered pages through the shared query
//!   builder.
//!
//! # Invariants
//! - `created_at` is written once on insert and never updated.
//! - Deleting a note removes its tag links and detaches linked tasks; tags
//!   and categories are left untouched.

use super::query::{fetch_page, note_filter_sql, FilterSql};
use super::taxonomy_repo::{load_tag_names, replace_tag_links, TagLink};
use super::{RepoError, RepoResult};
use crate::model::note::{NoteFilter, NoteRecord, NoteRef};
use crate::model::page::{NoteSortField, Page, PageSpec};
use crate::model::{EntityKind, RecordId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    notes.id AS id,
    notes.title AS title,
    notes.content AS content,
    notes.category_id AS category_id,
    categories.name AS category_name,
    notes.created_at AS created_at,
    notes.updated_at AS updated_at
FROM notes
LEFT JOIN categories ON categories.id = notes.category_id";

/// Column values written on note insert/update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteRow<'a> {
    pub title: &'a str,
    pub content: Option<&'a str>,
    pub category_id: Option<RecordId>,
    /// Ignored by `update_note`.
    pub created_at: i64,
    pub updated_at: i64,
}

/// Repository interface for note operations.
pub trait NoteRepository {
    fn insert_note(&self, row: &NoteRow<'_>) -> RepoResult<RecordId>;
    /// Overwrites title/content/category/updated_at of an existing note.
    fn update_note(&self, id: RecordId, row: &NoteRow<'_>) -> RepoResult<()>;
    /// Replaces the whole tag link set of one note.
    fn replace_note_tags(&self, id: RecordId, tag_ids: &[RecordId]) -> RepoResult<()>;
    fn get_note(&self, id: RecordId) -> RepoResult<Option<NoteRecord>>;
    fn get_note_ref(&self, id: RecordId) -> RepoResult<Option<NoteRef>>;
    fn note_exists(&self, id: RecordId) -> RepoResult<bool>;
    fn delete_note(&self, id: RecordId) -> RepoResult<()>;
    /// Plain paged scan with no filter predicates.
    fn scan_notes(&self, page: &PageSpec<NoteSortField>) -> RepoResult<Page<NoteRecord>>;
    fn find_notes_by_filters(
        &self,
        filter: &NoteFilter,
        page: &PageSpec<NoteSortField>,
    ) -> RepoResult<Page<NoteRecord>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn fetch(
        &self,
        filter: FilterSql,
        page: &PageSpec<NoteSortField>,
    ) -> RepoResult<Page<NoteRecord>> {
        fetch_page(self.conn, "notes", NOTE_SELECT_SQL, filter, page, |row| {
            parse_note_row(self.conn, row)
        })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, row: &NoteRow<'_>) -> RepoResult<RecordId> {
        self.conn.execute(
            "INSERT INTO notes (title, content, category_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                row.title,
                row.content,
                row.category_id,
                row.created_at,
                row.updated_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_note(&self, id: RecordId, row: &NoteRow<'_>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                category_id = ?4,
                updated_at = ?5
             WHERE id = ?1;",
            params![id, row.title, row.content, row.category_id, row.updated_at],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Note,
                id,
            });
        }
        Ok(())
    }

    fn replace_note_tags(&self, id: RecordId, tag_ids: &[RecordId]) -> RepoResult<()> {
        replace_tag_links(self.conn, TagLink::Note, id, tag_ids)
    }

    fn get_note(&self, id: RecordId) -> RepoResult<Option<NoteRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE notes.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(self.conn, row)?)),
            None => Ok(None),
        }
    }

    fn get_note_ref(&self, id: RecordId) -> RepoResult<Option<NoteRef>> {
        let note = self
            .conn
            .query_row("SELECT id, title FROM notes WHERE id = ?1;", [id], |row| {
                Ok(NoteRef {
                    id: row.get("id")?,
                    title: row.get("title")?,
                })
            })
            .optional()?;
        Ok(note)
    }

    fn note_exists(&self, id: RecordId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_note(&self, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Note,
                id,
            });
        }
        Ok(())
    }

    fn scan_notes(&self, page: &PageSpec<NoteSortField>) -> RepoResult<Page<NoteRecord>> {
        self.fetch(FilterSql::unfiltered(), page)
    }

    fn find_notes_by_filters(
        &self,
        filter: &NoteFilter,
        page: &PageSpec<NoteSortField>,
    ) -> RepoResult<Page<NoteRecord>> {
        self.fetch(note_filter_sql(filter), page)
    }
}

fn parse_note_row(conn: &Connection, row: &Row<'_>) -> RepoResult<NoteRecord> {
    let id: RecordId = row.get("id")?;
    Ok(NoteRecord {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        category_id: row.get("category_id")?,
        category_name: row.get("category_name")?,
        tags: load_tag_names(conn, TagLink::Note, id)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
