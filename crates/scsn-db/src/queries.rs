use crate::models::{PostRow, UserRow};
use crate::{Database, timestamp_now};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use scsn_types::models::PostKind;

impl Database {
    // -- Users --

    /// The lowest-id user, who acts for every create in this demo.
    pub fn find_first_user(&self) -> Result<Option<UserRow>> {
        self.with_conn(query_first_user)
    }

    pub fn count_users(&self) -> Result<i64> {
        self.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?))
    }

    // -- Posts --

    /// Oldest-first feed, ties broken by id, truncated to `limit` rows.
    pub fn list_posts(&self, limit: u32) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| query_posts(conn, limit))
    }

    pub fn count_posts(&self) -> Result<i64> {
        self.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?))
    }

    /// Insert a non-highlighted post by `author` and return the stored row.
    ///
    /// `created_at` is the current time, clamped so it never sorts before
    /// the newest existing post.
    pub fn insert_post(&self, author: &UserRow, body: &str, kind: PostKind) -> Result<PostRow> {
        self.with_conn_mut(|conn| {
            let (id, created_at): (i64, String) = conn.query_row(
                "INSERT INTO posts (user_id, body, kind, created_at, is_highlight)
                 VALUES (?1, ?2, ?3, MAX(?4, COALESCE((SELECT MAX(created_at) FROM posts), ?4)), 0)
                 RETURNING id, created_at",
                rusqlite::params![author.id, body, kind.as_str(), timestamp_now()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            Ok(PostRow {
                id,
                user_id: author.id,
                body: body.to_string(),
                kind: kind.as_str().to_string(),
                created_at,
                is_highlight: false,
                handle: author.handle.clone(),
                display_name: author.display_name.clone(),
            })
        })
    }
}

fn query_first_user(conn: &Connection) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, handle, display_name, bio, created_at FROM users ORDER BY id ASC LIMIT 1",
    )?;

    let row = stmt
        .query_row([], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                handle: row.get(1)?,
                display_name: row.get(2)?,
                bio: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_posts(conn: &Connection, limit: u32) -> Result<Vec<PostRow>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.user_id, p.body, p.kind, p.created_at, p.is_highlight,
                u.handle, u.display_name
         FROM posts p
         JOIN users u ON p.user_id = u.id
         ORDER BY p.created_at ASC, p.id ASC
         LIMIT ?1",
    )?;

    let rows = stmt
        .query_map([limit], |row| {
            Ok(PostRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                body: row.get(2)?,
                kind: row.get(3)?,
                created_at: row.get(4)?,
                is_highlight: row.get(5)?,
                handle: row.get(6)?,
                display_name: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
