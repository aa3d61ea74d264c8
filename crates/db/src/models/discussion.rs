//! Discussion models.

use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `discussions` table, with its vote score.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Discussion {
    pub id: DbId,
    pub community_id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub body: Option<String>,
    /// Free-form payload carried through untouched (tags, cover image, ...).
    pub metadata: serde_json::Value,
    pub score: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new discussion.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiscussion {
    pub title: String,
    pub body: Option<String>,
    pub metadata: Option<serde_json::Value>,
}
