//! Comment models.

use commons_core::comment_tree::Threaded;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A live row from the `comments` table, with its vote score.
///
/// Soft-deleted comments are never loaded, so their replies surface as
/// orphans and are promoted to the root of the thread.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub discussion_id: DbId,
    pub author_id: DbId,
    pub parent_comment_id: Option<DbId>,
    pub content: String,
    /// Free-form payload carried through untouched.
    pub metadata: serde_json::Value,
    pub score: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Threaded for Comment {
    type Key = DbId;

    fn thread_key(&self) -> &DbId {
        &self.id
    }

    fn parent_key(&self) -> Option<&DbId> {
        self.parent_comment_id.as_ref()
    }
}

/// DTO for creating a new comment (top-level or reply).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub content: String,
    pub parent_comment_id: Option<DbId>,
    pub metadata: Option<serde_json::Value>,
}
