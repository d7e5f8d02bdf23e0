use anyhow::Result;
use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info, warn};

use crate::{format_timestamp, parse_timestamp};

/// Matches the stored format, `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
const STORED_TIMESTAMP_GLOB: &str =
    "[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]T[0-9][0-9]:[0-9][0-9]:[0-9][0-9].[0-9][0-9][0-9][0-9][0-9][0-9]Z";

/// Create the feed tables if they are missing. Existing tables are left as is.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            handle          TEXT NOT NULL UNIQUE,
            display_name    TEXT NOT NULL,
            bio             TEXT,
            created_at      TEXT NOT NULL
        );

        -- kind: normal | help | 911 | emergency_address
        CREATE TABLE IF NOT EXISTS posts (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         INTEGER NOT NULL REFERENCES users(id),
            body            TEXT NOT NULL,
            kind            TEXT NOT NULL DEFAULT 'normal',
            created_at      TEXT NOT NULL,
            is_highlight    INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_posts_feed
            ON posts(created_at, id);
        ",
    )?;

    debug!("Database schema ensured");
    Ok(())
}

/// Rewrite `created_at` values not in the stored format (e.g. rows written
/// by `CURRENT_TIMESTAMP` as `YYYY-MM-DD HH:MM:SS`) so feed ordering and the
/// insert clamp, which compare text, see instants. Unparseable values are
/// left alone and logged.
pub fn normalize_timestamps(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    for table in ["users", "posts"] {
        let foreign: Vec<(i64, String)> = {
            let mut stmt = tx.prepare(&format!(
                "SELECT id, created_at FROM {table} WHERE created_at NOT GLOB ?1"
            ))?;
            stmt.query_map([STORED_TIMESTAMP_GLOB], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<std::result::Result<_, _>>()?
        };
        if foreign.is_empty() {
            continue;
        }

        let mut update = tx.prepare(&format!("UPDATE {table} SET created_at = ?1 WHERE id = ?2"))?;
        let mut rewritten = 0;
        for (id, raw) in &foreign {
            match parse_timestamp(raw) {
                Some(ts) => {
                    update.execute(rusqlite::params![format_timestamp(ts), id])?;
                    rewritten += 1;
                }
                None => warn!("Unparseable created_at '{}' on {} {}; left as is", raw, table, id),
            }
        }
        info!("Normalized {} timestamps in {}", rewritten, table);
    }

    tx.commit()?;
    Ok(())
}
