//! Vote ("interaction") rows.

use commons_core::error::CoreError;
use commons_core::types::{DbId, Timestamp};
use commons_core::votes::{VoteRecord, VoteTarget, VoteType};
use sqlx::FromRow;

/// A row from the `votes` table.
///
/// The table enforces that exactly one of `discussion_id` / `comment_id` is
/// set; [`VoteRecord`] turns that pair into a [`VoteTarget`].
#[derive(Debug, Clone, FromRow)]
pub struct VoteRow {
    pub id: DbId,
    pub user_id: DbId,
    pub discussion_id: Option<DbId>,
    pub comment_id: Option<DbId>,
    pub vote_type: String,
    pub value: i16,
    pub created_at: Timestamp,
}

impl TryFrom<VoteRow> for VoteRecord {
    type Error = CoreError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(VoteRecord {
            id: row.id,
            user_id: row.user_id,
            target: VoteTarget::from_columns(row.discussion_id, row.comment_id)?,
            vote_type: row.vote_type.parse::<VoteType>()?,
            value: row.value,
            created_at: row.created_at,
        })
    }
}
