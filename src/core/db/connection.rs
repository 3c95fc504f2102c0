/// Connection Management Module
///
/// This module provides scoped access to the backing SQLite store. Every
/// logical operation opens its own connection, runs its statements and
/// releases the connection again; nothing is held between operations.

use crate::core::db::query::QueryExecutor;
use crate::core::db::schema;
use crate::core::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Handle to a store location on disk
///
/// A `Store` holds no open connection. It only knows where the database lives
/// and hands out short-lived scopes against it.
#[derive(Debug, Clone)]
pub struct Store {
    location: PathBuf,
}

impl Store {
    /// Opens the store at `location`, creating the schema if it is missing
    ///
    /// # Errors
    ///
    /// Returns `TutorError::StoreUnavailable` if the file cannot be opened or
    /// the schema statements fail.
    pub fn open<P: AsRef<Path>>(location: P) -> Result<Self> {
        let store = Store {
            location: location.as_ref().to_path_buf(),
        };
        store.scope(schema::initialize)?;
        Ok(store)
    }

    /// Path of the database file this store points at
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Runs `work` inside a freshly opened scope
    ///
    /// The scope is committed and released when `work` returns `Ok`. When
    /// `work` fails the scope is still released before the error is returned
    /// to the caller.
    pub fn scope<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&mut QueryExecutor<'_>) -> Result<T>,
    {
        let scope = ScopedConnection::begin(&self.location)?;
        let value = {
            let mut executor = scope.executor();
            work(&mut executor)?
        };
        scope.end()?;
        Ok(value)
    }
}

/// One open connection, bound to a single unit of work
///
/// `begin` opens the connection; `end` commits whatever is still pending and
/// releases it. Dropping the guard without calling `end` (early return, `?`,
/// panic unwinding) performs the same commit-then-release, logging instead of
/// returning a commit failure.
#[derive(Debug)]
pub struct ScopedConnection {
    connection: Connection,
    location: PathBuf,
}

impl ScopedConnection {
    /// Opens a connection to the database at `location`
    ///
    /// # Errors
    ///
    /// Returns `TutorError::StoreUnavailable` if SQLite cannot open the file.
    pub fn begin(location: &Path) -> Result<Self> {
        let connection = Connection::open(location)?;
        debug!("Opened scope on {}", location.display());
        Ok(ScopedConnection {
            connection,
            location: location.to_path_buf(),
        })
    }

    /// Returns an executor that issues statements through this scope
    pub fn executor(&self) -> QueryExecutor<'_> {
        QueryExecutor::new(&self.connection)
    }

    /// Commits pending writes and releases the connection
    pub fn end(self) -> Result<()> {
        self.commit_pending()
        // `self` drops here, which closes the connection
    }

    fn commit_pending(&self) -> Result<()> {
        if !self.connection.is_autocommit() {
            self.connection.execute_batch("COMMIT")?;
        }
        Ok(())
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        if let Err(e) = self.commit_pending() {
            warn!(
                "Failed to commit pending writes on {}: {}",
                self.location.display(),
                e
            );
        }
        debug!("Released scope on {}", self.location.display());
    }
}
