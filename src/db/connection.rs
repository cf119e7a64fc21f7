use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use crate::error::{LunchlyError, Result};

/// Environment variable that overrides the database location.
pub const DATABASE_ENV: &str = "LUNCHLY_DATABASE";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".lunchly";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "lunchly.sqlite";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        phone TEXT NOT NULL DEFAULT '',
        notes TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_id INTEGER NOT NULL REFERENCES customers(id),
        start_at TEXT NOT NULL,
        num_guests INTEGER NOT NULL CHECK (num_guests >= 1),
        notes TEXT NOT NULL DEFAULT ''
    );

    CREATE INDEX IF NOT EXISTS idx_reservations_customer ON reservations(customer_id);
";

/// Open the database at the configured location (see [`db_path`]), creating
/// the file and tables on first use.
pub fn open_database() -> Result<Connection> {
    open_database_at(db_path()?)
}

/// Open (or create) the database file at `path` and make sure the schema is in
/// place.
pub fn open_database_at(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    tracing::info!("opened database at {}", path.display());
    Ok(conn)
}

/// Fresh private database that lives as long as the connection.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Run the idempotent table setup against `conn`. Also turns on
/// `PRAGMA foreign_keys` so reservations cannot point at missing customers,
/// and registers the `casefold` SQL function used by customer search.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    register_casefold(conn)?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// `casefold(text)` lowercases with full Unicode rules. SQLite's own `LIKE`
/// and `lower()` only fold ASCII letters.
fn register_casefold(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )?;
    Ok(())
}

/// Resolve the database path: `LUNCHLY_DATABASE` when set, otherwise a file
/// inside `~/.lunchly`.
pub fn db_path() -> Result<PathBuf> {
    if let Some(path) = env::var_os(DATABASE_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let base_dirs = BaseDirs::new()
        .ok_or_else(|| LunchlyError::Config("could not locate home directory".to_string()))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_setup_is_idempotent() {
        let conn = open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('customers', 'reservations')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let conn = open_in_memory().unwrap();
        let result = conn.execute(
            "INSERT INTO reservations (customer_id, start_at, num_guests) VALUES (42, '2021-04-01 18:30:00', 2)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn casefold_lowers_non_ascii_letters() {
        let conn = open_in_memory().unwrap();
        let folded: String = conn
            .query_row("SELECT casefold('ÅNGSTRÖM Özil')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "ångström özil");
    }

    #[test]
    fn phone_and_notes_reject_null() {
        let conn = open_in_memory().unwrap();
        let phone = conn.execute(
            "INSERT INTO customers (first_name, last_name, phone) VALUES ('Ada', 'Lovelace', NULL)",
            [],
        );
        assert!(phone.is_err());

        let notes = conn.execute(
            "INSERT INTO customers (first_name, last_name, notes) VALUES ('Ada', 'Lovelace', NULL)",
            [],
        );
        assert!(notes.is_err());
    }

    #[test]
    fn open_database_at_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lunchly.sqlite");

        open_database_at(&path).unwrap();
        assert!(path.exists());
    }
}
