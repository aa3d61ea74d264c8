//! Persistence port consumed by the vote reconciler.
//!
//! Every filter is an equality on `user_id`, `vote_type`, and exactly one of
//! `discussion_id` / `comment_id`, which [`VoteTarget`] encodes.

use async_trait::async_trait;

use crate::types::DbId;
use crate::votes::{NewVote, VoteRecord, VoteTarget, VoteType};

/// Record CRUD over the votes table.
///
/// Methods take `&mut self` so an implementation can wrap a single
/// connection or an open transaction.
#[async_trait]
pub trait VoteStore: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Find the vote of `user_id` on `target` with direction `vote_type`.
    async fn find_vote(
        &mut self,
        user_id: DbId,
        target: VoteTarget,
        vote_type: VoteType,
    ) -> Result<Option<VoteRecord>, Self::Error>;

    /// Every vote `user_id` holds on `target`, oldest first.
    async fn list_votes(
        &mut self,
        user_id: DbId,
        target: VoteTarget,
    ) -> Result<Vec<VoteRecord>, Self::Error>;

    async fn insert_vote(&mut self, vote: NewVote) -> Result<VoteRecord, Self::Error>;

    async fn delete_vote(&mut self, vote_id: DbId) -> Result<(), Self::Error>;
}
