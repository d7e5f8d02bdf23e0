use anyhow::Result;
use rusqlite::{Connection, TransactionBehavior};
use scsn_types::models::PostKind;
use tracing::info;

use crate::timestamp_now;

pub const SEED_HANDLE: &str = "@senior_demo";
pub const SEED_DISPLAY_NAME: &str = "Senior Demo User";
pub const SEED_BIO: &str = "Practicing safe communication and emergency planning with SCSN.";

pub struct SeedPost {
    pub body: &'static str,
    pub is_highlight: bool,
}

/// Demo feed, oldest first. Only the welcome post is highlighted.
pub const SEED_POSTS: [SeedPost; 3] = [
    SeedPost {
        body: "Welcome to the Senior Citizens Social Network. This feed is for civic and support use.",
        is_highlight: true,
    },
    SeedPost {
        body: "Tip: Keep a written list of emergency contacts near the phone in case the device fails.",
        is_highlight: false,
    },
    SeedPost {
        body: "Quick buttons 1–3 are training tools. Always call 911 directly in a real emergency.",
        is_highlight: false,
    },
];

/// Insert the demo user and posts if the users table is empty.
///
/// The emptiness check and the inserts share one write transaction, so a
/// second process racing us either waits for our commit and sees the user,
/// or fails on the `handle` unique constraint. Returns whether it seeded.
pub fn seed_if_empty(conn: &mut Connection) -> Result<bool> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let users: i64 = tx.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    if users > 0 {
        return Ok(false);
    }

    let now = timestamp_now();
    tx.execute(
        "INSERT INTO users (handle, display_name, bio, created_at) VALUES (?1, ?2, ?3, ?4)",
        (SEED_HANDLE, SEED_DISPLAY_NAME, SEED_BIO, &now),
    )?;
    let user_id = tx.last_insert_rowid();

    {
        let mut stmt = tx.prepare(
            "INSERT INTO posts (user_id, body, kind, created_at, is_highlight)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for post in &SEED_POSTS {
            stmt.execute(rusqlite::params![
                user_id,
                post.body,
                PostKind::Normal.as_str(),
                &now,
                post.is_highlight,
            ])?;
        }
    }

    tx.commit()?;

    info!("Seeded demo user {} with {} posts", SEED_HANDLE, SEED_POSTS.len());
    Ok(true)
}
