//! Unit-of-work boundary over the repositories.
//!
//! # Responsibility
//! - Run one service operation against one transaction.
//! - Hand the operation a bundle of repositories bound to that transaction.
//!
//! # Invariants
//! - Writes become visible together on `Ok`, and none do on `Err`
//!   (the transaction is dropped, which rolls back).
//! - Reads run in their own transaction and observe one snapshot, so a
//!   reader never sees a half-replaced tag link set.

use super::note_repo::{NoteRepository, SqliteNoteRepository};
use super::schema::ensure_connection_ready;
use super::task_repo::{SqliteTaskRepository, TaskRepository};
use super::taxonomy_repo::{CategoryRepository, SqliteTaxonomyRepository, TagRepository};
use super::{RepoError, RepoResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;

/// Repositories bound to one open unit of work.
pub trait Repositories {
    fn notes(&self) -> &dyn NoteRepository;
    fn tasks(&self) -> &dyn TaskRepository;
    fn categories(&self) -> &dyn CategoryRepository;
    fn tags(&self) -> &dyn TagRepository;
}

/// Transactional entry point consumed by services.
pub trait Store {
    /// Runs read-only work on a consistent snapshot.
    fn read<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Repositories) -> Result<T, E>,
        E: From<RepoError>;

    /// Runs work whose writes commit together or not at all.
    fn write<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Repositories) -> Result<T, E>,
        E: From<RepoError>;
}

impl<S: Store> Store for &mut S {
    fn read<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Repositories) -> Result<T, E>,
        E: From<RepoError>,
    {
        (**self).read(work)
    }

    fn write<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Repositories) -> Result<T, E>,
        E: From<RepoError>,
    {
        (**self).write(work)
    }
}

/// SQLite repositories sharing one connection or transaction.
pub struct SqliteRepositories<'conn> {
    notes: SqliteNoteRepository<'conn>,
    tasks: SqliteTaskRepository<'conn>,
    taxonomy: SqliteTaxonomyRepository<'conn>,
}

impl<'conn> SqliteRepositories<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            notes: SqliteNoteRepository::new(conn),
            tasks: SqliteTaskRepository::new(conn),
            taxonomy: SqliteTaxonomyRepository::new(conn),
        }
    }
}

impl Repositories for SqliteRepositories<'_> {
    fn notes(&self) -> &dyn NoteRepository {
        &self.notes
    }

    fn tasks(&self) -> &dyn TaskRepository {
        &self.tasks
    }

    fn categories(&self) -> &dyn CategoryRepository {
        &self.taxonomy
    }

    fn tags(&self) -> &dyn TagRepository {
        &self.taxonomy
    }
}

/// SQLite-backed store owning one connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when migrations were not applied.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Opens (creating if needed) and migrates a database file.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens and migrates a private in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }

    fn run<T, E, F>(&mut self, behavior: TransactionBehavior, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Repositories) -> Result<T, E>,
        E: From<RepoError>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(behavior)
            .map_err(|err| E::from(RepoError::from(err)))?;
        let value = work(&SqliteRepositories::new(&tx))?;
        tx.commit().map_err(|err| E::from(RepoError::from(err)))?;
        Ok(value)
    }
}

impl Store for SqliteStore {
    fn read<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Repositories) -> Result<T, E>,
        E: From<RepoError>,
    {
        self.run(TransactionBehavior::Deferred, work)
    }

    fn write<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Repositories) -> Result<T, E>,
        E: From<RepoError>,
    {
        self.run(TransactionBehavior::Immediate, work)
    }
}
