//! In-memory [`VoteStore`] for tests.
//!
//! Votes are kept in insertion order. A single failure can be armed with
//! [`MemoryVoteStore::fail_on`] to exercise the reconciler's error paths.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::DbId;
use crate::vote_store::VoteStore;
use crate::votes::{NewVote, VoteRecord, VoteTarget, VoteType};

/// Operation that should fail on its next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Find,
    Insert,
    Delete,
}

#[derive(Debug, Default)]
pub struct MemoryVoteStore {
    votes: Vec<VoteRecord>,
    armed: Option<FailPoint>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of `point` fail with a storage error.
    pub fn fail_on(&mut self, point: FailPoint) {
        self.armed = Some(point);
    }

    /// Insert a vote directly, bypassing any reconciliation.
    pub fn seed(&mut self, vote: NewVote) -> VoteRecord {
        let record = VoteRecord {
            id: Uuid::new_v4(),
            user_id: vote.user_id,
            target: vote.target,
            vote_type: vote.vote_type,
            value: vote.value(),
            created_at: Utc::now(),
        };
        self.votes.push(record.clone());
        record
    }

    /// All votes held by `user_id` on `target`, oldest first.
    pub fn votes_for(&self, user_id: DbId, target: VoteTarget) -> Vec<VoteRecord> {
        self.votes
            .iter()
            .filter(|v| v.user_id == user_id && v.target == target)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    fn trip(&mut self, point: FailPoint) -> Result<(), CoreError> {
        if self.armed == Some(point) {
            self.armed = None;
            return Err(CoreError::Storage(format!("injected {point:?} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl VoteStore for MemoryVoteStore {
    type Error = CoreError;

    async fn find_vote(
        &mut self,
        user_id: DbId,
        target: VoteTarget,
        vote_type: VoteType,
    ) -> Result<Option<VoteRecord>, CoreError> {
        self.trip(FailPoint::Find)?;
        Ok(self
            .votes
            .iter()
            .find(|v| v.user_id == user_id && v.target == target && v.vote_type == vote_type)
            .cloned())
    }

    async fn list_votes(
        &mut self,
        user_id: DbId,
        target: VoteTarget,
    ) -> Result<Vec<VoteRecord>, CoreError> {
        self.trip(FailPoint::Find)?;
        Ok(self.votes_for(user_id, target))
    }

    async fn insert_vote(&mut self, vote: NewVote) -> Result<VoteRecord, CoreError> {
        self.trip(FailPoint::Insert)?;
        Ok(self.seed(vote))
    }

    async fn delete_vote(&mut self, vote_id: DbId) -> Result<(), CoreError> {
        self.trip(FailPoint::Delete)?;
        self.votes.retain(|v| v.id != vote_id);
        Ok(())
    }
}
