//! Repository port for value table persistence.
//!
//! This module defines the trait boundary between the domain and infrastructure
//! layers for storing and retrieving trained value tables.

use std::path::Path;

use crate::{Result, q_learning::QTable};

/// Port for persisting and loading value tables.
///
/// # Examples
///
/// ```no_run
/// use mazerl::ports::TableRepository;
/// use mazerl::q_learning::QTable;
/// use std::path::Path;
///
/// fn save_table<R: TableRepository>(repo: &R, table: &QTable, path: &Path) -> mazerl::Result<()> {
///     repo.save(table, path)
/// }
/// ```
pub trait TableRepository {
    /// Save a table, replacing whatever is stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization fails.
    fn save(&self, table: &QTable, path: &Path) -> Result<()>;

    /// Load a table from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is stored there (see
    /// [`Error::is_not_found`](crate::Error::is_not_found)) or the stored
    /// data cannot be decoded.
    fn load(&self, path: &Path) -> Result<QTable>;
}
