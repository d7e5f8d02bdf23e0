use std::sync::Arc;

use chrono::DateTime;
use thiserror::Error;
use tracing::{debug, info, warn};

use scsn_db::{Database, parse_timestamp};
use scsn_db::models::PostRow;
use scsn_types::api::PostResponse;
use scsn_types::models::PostKind;

/// Maximum number of posts returned by a feed listing.
///
/// Applied after the oldest-first sort, so once the table outgrows it the
/// feed shows the earliest posts, not the latest.
pub const FEED_LIMIT: u32 = 100;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Trimmed body was empty.
    #[error("body required")]
    BodyRequired,
    /// No user exists to author the post. Bootstrap seeds one, so this
    /// means the store was altered behind our back.
    #[error("no user found to act as author")]
    ActorNotFound,
    #[error("database unavailable")]
    StoreUnavailable(#[source] anyhow::Error),
}

/// Read/write operations over the shared feed.
#[derive(Clone)]
pub struct FeedService {
    db: Arc<Database>,
}

impl FeedService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn list_posts(&self) -> Result<Vec<PostResponse>, FeedError> {
        let rows = self
            .db
            .list_posts(FEED_LIMIT)
            .map_err(FeedError::StoreUnavailable)?;

        Ok(rows.into_iter().map(to_response).collect())
    }

    /// Create a post on behalf of the demo actor (the lowest-id user).
    ///
    /// The body is trimmed and must not end up empty. `raw_kind` is trimmed
    /// too; anything outside the known kinds becomes `normal`.
    pub fn create_post(
        &self,
        raw_body: &str,
        raw_kind: Option<&str>,
    ) -> Result<PostResponse, FeedError> {
        let body = raw_body.trim();
        if body.is_empty() {
            return Err(FeedError::BodyRequired);
        }

        let kind = PostKind::parse_or_default(raw_kind);
        if let Some(raw) = raw_kind {
            if raw.trim() != kind.as_str() {
                debug!("Coerced post kind {:?} to {}", raw, kind);
            }
        }

        let actor = self
            .db
            .find_first_user()
            .map_err(FeedError::StoreUnavailable)?
            .ok_or(FeedError::ActorNotFound)?;

        let row = self
            .db
            .insert_post(&actor, body, kind)
            .map_err(FeedError::StoreUnavailable)?;

        info!("Post {} created by {} (kind={})", row.id, row.handle, kind);
        Ok(to_response(row))
    }

    /// `(users, posts)` row counts.
    pub fn counts(&self) -> Result<(i64, i64), FeedError> {
        let users = self.db.count_users().map_err(FeedError::StoreUnavailable)?;
        let posts = self.db.count_posts().map_err(FeedError::StoreUnavailable)?;
        Ok((users, posts))
    }
}

fn to_response(row: PostRow) -> PostResponse {
    let kind = row.kind.parse::<PostKind>().unwrap_or_else(|e| {
        warn!("Post {} has {}; serving it as normal", row.id, e);
        PostKind::Normal
    });

    PostResponse {
        id: row.id,
        created_at: parse_timestamp(&row.created_at).unwrap_or_else(|| {
            warn!("Corrupt created_at '{}' on post {}", row.created_at, row.id);
            DateTime::default()
        }),
        body: row.body,
        kind,
        is_highlight: row.is_highlight,
        handle: row.handle,
        display_name: row.display_name,
    }
}
