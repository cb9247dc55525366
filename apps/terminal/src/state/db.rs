//! # Database State

use fizz_db::Database;

/// Wrapper around `Database` held by the terminal.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ```rust,ignore
    /// let catalog = db_state.inner().products().list().await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
