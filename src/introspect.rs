//! Read-only listing of schema objects in a SQLite store.
//!
//! Every call opens its own connection inside [`with_connection`] and drops
//! it before returning, on success and on error alike. Nothing is cached:
//! a catalog always reflects the store at query time.

use crate::error::{MaintError, Result};
use rusqlite::{Connection, ErrorCode, OpenFlags};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CATALOG_QUERY: &str = "SELECT name FROM sqlite_master WHERE type = ?1";

/// Object types recorded in `sqlite_master.type`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum ObjectKind {
    #[default]
    Table,
    View,
    Index,
    Trigger,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::View => "view",
            ObjectKind::Index => "index",
            ObjectKind::Trigger => "trigger",
        }
    }

    fn plural_label(&self) -> &'static str {
        match self {
            ObjectKind::Table => "Tables",
            ObjectKind::View => "Views",
            ObjectKind::Index => "Indexes",
            ObjectKind::Trigger => "Triggers",
        }
    }
}

impl TryFrom<&str> for ObjectKind {
    type Error = MaintError;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "table" => Ok(ObjectKind::Table),
            "view" => Ok(ObjectKind::View),
            "index" => Ok(ObjectKind::Index),
            "trigger" => Ok(ObjectKind::Trigger),
            other => Err(MaintError::UnknownObjectKind(other.to_string())),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of one kind of schema object, in the order SQLite returned them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchemaCatalog {
    pub location: PathBuf,
    pub kind: ObjectKind,
    pub names: Vec<String>,
}

impl SchemaCatalog {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    /// One-line rendering, e.g. `Tables: users, posts` or `Tables: (none)`.
    pub fn summary_line(&self) -> String {
        let listed = if self.names.is_empty() {
            "(none)".to_string()
        } else {
            self.names.join(", ")
        };
        format!("{}: {}", self.kind.plural_label(), listed)
    }
}

/// List the tables in the store at `location`.
pub fn list_tables(location: &Path) -> Result<SchemaCatalog> {
    list_objects(location, ObjectKind::Table)
}

pub fn list_objects(location: &Path, kind: ObjectKind) -> Result<SchemaCatalog> {
    let names = with_connection(location, |conn| catalog_names(conn, kind))?;
    debug!(store = %location.display(), %kind, count = names.len(), "listed schema objects");
    Ok(SchemaCatalog {
        location: location.to_path_buf(),
        kind,
        names,
    })
}

/// Query `sqlite_master` on an already-open connection.
pub fn catalog_names(conn: &Connection, kind: ObjectKind) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(CATALOG_QUERY)?;
    let rows = stmt.query_map([kind.as_str()], |row| row.get::<_, String>(0))?;
    let names = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

/// Open `location` read-only, run `work`, and close the connection.
///
/// The location must already exist; SQLite would otherwise be free to treat
/// a typo as a request for a new empty database.
pub fn with_connection<T, F>(location: &Path, work: F) -> Result<T>
where
    F: FnOnce(&Connection) -> rusqlite::Result<T>,
{
    fs::metadata(location).map_err(|err| MaintError::io(location, err))?;

    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(location, flags)
        .map_err(|err| classify_store_error(location, err))?;
    debug!(store = %location.display(), "opened store connection");

    let outcome = work(&conn).map_err(|err| classify_store_error(location, err));

    match conn.close() {
        Ok(()) => debug!(store = %location.display(), "closed store connection"),
        Err((_conn, err)) => {
            // The connection is still dropped here; only surface the close
            // failure when the work itself succeeded.
            if outcome.is_ok() {
                return Err(classify_store_error(location, err));
            }
        }
    }
    outcome
}

fn classify_store_error(location: &Path, err: rusqlite::Error) -> MaintError {
    let path = location.to_path_buf();
    let corrupt = matches!(
        &err,
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(failure.code, ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt)
    );
    if corrupt {
        MaintError::CorruptStore { path, source: err }
    } else {
        MaintError::Store { path, source: err }
    }
}
