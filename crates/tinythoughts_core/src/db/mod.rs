//! SQLite entity store.
//!
//! # Responsibility
//! - Open and configure the connection that backs every repository.
//! - Apply schema migrations before any entity is read or written.
//!
//! # Invariants
//! - Returned connections enforce foreign keys, so no thread or thought can
//!   outlive its parent row.
//! - Schema version is tracked via `PRAGMA user_version`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening or upgrading the thoughts store.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// One schema script failed; the upgrade was rolled back as a whole.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build of the store.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Schema version the error is tied to, if any.
    pub fn schema_version(&self) -> Option<u32> {
        match self {
            Self::Sqlite(_) => None,
            Self::Migration { version, .. } => Some(*version),
            Self::UnsupportedSchemaVersion { db_version, .. } => Some(*db_version),
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "migration {version} ({name}) failed: {source}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "thoughts store is at schema {db_version}; this build reads up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
