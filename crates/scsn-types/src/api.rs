use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::PostKind;

// -- Posts --

/// Body of a create request. Both fields are optional on the wire; `kind`
/// stays a raw string so unknown values can be coerced instead of rejected.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

/// A feed entry joined with its author's display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub body: String,
    pub kind: PostKind,
    pub created_at: DateTime<Utc>,
    pub is_highlight: bool,
    pub handle: String,
    pub display_name: String,
}

// -- Health --

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub users: i64,
    pub posts: i64,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
