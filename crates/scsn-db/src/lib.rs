pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

/// How long a connection waits on another process's write lock before
/// reporting the store as busy.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The feed store. Construct once at startup and share by `Arc`.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.ensure_initialized()?;

        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// Private, non-persistent store. Used by tests and throwaway demos.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.ensure_initialized()?;

        info!("In-memory database opened");
        Ok(db)
    }

    /// Create missing tables, rewrite foreign timestamps into the stored
    /// format, and seed the demo user and posts on an empty store.
    /// Idempotent; cheap enough to call before any request.
    pub fn ensure_initialized(&self) -> Result<()> {
        self.with_conn_mut(|conn| {
            migrations::run(conn)?;
            migrations::normalize_timestamps(conn)?;
            seed::seed_if_empty(conn)?;
            Ok(())
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }

    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&mut conn)
    }
}

/// Current time in the stored timestamp format.
///
/// Fixed width (always six fractional digits, `Z` suffix) so that comparing
/// the text compares the instants.
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp. Besides RFC 3339, accepts the zone-less
/// `YYYY-MM-DD HH:MM:SS[.fff]` text SQLite's `CURRENT_TIMESTAMP` and
/// `datetime('now')` produce, read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|ndt| ndt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_fixed_width_utc() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000000Z".len());
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn parses_sqlite_and_rfc3339_text() {
        let expected = "2026-10-19T01:48:57.000000Z";
        for raw in [
            "2026-10-19 01:48:57",
            "2026-10-19 01:48:57.000",
            "2026-10-19T01:48:57Z",
            "2026-10-19T03:48:57+02:00",
            expected,
        ] {
            let ts = parse_timestamp(raw).unwrap_or_else(|| panic!("failed on {raw}"));
            assert_eq!(format_timestamp(ts), expected);
        }
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn in_memory_store_is_seeded_on_open() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.count_users().unwrap(), 1);
        assert_eq!(db.count_posts().unwrap(), 3);
    }
}
