//! Database row types. These map directly to SQLite rows.
//! Distinct from scsn-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: i64,
    pub handle: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub created_at: String,
}

/// A post joined with its author's display fields.
pub struct PostRow {
    pub id: i64,
    pub user_id: i64,
    pub body: String,
    /// Raw stored text; not guaranteed to be a known kind.
    pub kind: String,
    pub created_at: String,
    pub is_highlight: bool,
    pub handle: String,
    pub display_name: String,
}
