//! Vote reconciliation: toggle on, toggle off, and direction switch.
//!
//! The protocol runs strictly in order against a [`VoteStore`]:
//!
//! 1. Same-direction vote held: delete it, report [`VoteAction::Removed`].
//! 2. Opposite-direction vote held: delete it and continue.
//! 3. Insert the requested vote, report [`VoteAction::Changed`] if step 2
//!    deleted something, [`VoteAction::Added`] otherwise.
//!
//! A store error at any step aborts the remaining steps and is returned as-is.
//! Callers that need the whole sequence to be atomic (or safe against
//! concurrent requests from the same user) pass a store that wraps a
//! transaction.

use crate::types::DbId;
use crate::vote_store::VoteStore;
use crate::votes::{NewVote, VoteAction, VoteOutcome, VoteTarget, VoteType};

/// Apply `vote_type` from `user_id` to `target`.
pub async fn apply_vote<S>(
    store: &mut S,
    user_id: DbId,
    target: VoteTarget,
    vote_type: VoteType,
) -> Result<VoteOutcome, S::Error>
where
    S: VoteStore + ?Sized,
{
    if let Some(existing) = store.find_vote(user_id, target, vote_type).await? {
        store.delete_vote(existing.id).await?;
        tracing::debug!(%user_id, %target, %vote_type, vote_id = %existing.id, "Vote toggled off");
        return Ok(VoteOutcome {
            action: VoteAction::Removed,
            vote_type,
        });
    }

    let replaced = match store
        .find_vote(user_id, target, vote_type.opposite())
        .await?
    {
        Some(opposite) => {
            store.delete_vote(opposite.id).await?;
            tracing::debug!(%user_id, %target, vote_id = %opposite.id, "Opposite vote removed");
            true
        }
        None => false,
    };

    let inserted = store
        .insert_vote(NewVote {
            user_id,
            target,
            vote_type,
        })
        .await?;
    tracing::debug!(
        %user_id,
        %target,
        %vote_type,
        vote_id = %inserted.id,
        replaced,
        "Vote inserted"
    );

    Ok(VoteOutcome {
        action: if replaced {
            VoteAction::Changed
        } else {
            VoteAction::Added
        },
        vote_type,
    })
}

/// The direction `user_id` currently holds on `target`, if any.
///
/// More than one stored vote for the same user and target breaks the
/// single-vote invariant. The oldest vote wins and the violation is logged.
pub async fn get_user_vote<S>(
    store: &mut S,
    user_id: DbId,
    target: VoteTarget,
) -> Result<Option<VoteType>, S::Error>
where
    S: VoteStore + ?Sized,
{
    let votes = store.list_votes(user_id, target).await?;

    if votes.len() > 1 {
        let vote_ids: Vec<String> = votes.iter().map(|v| v.id.to_string()).collect();
        tracing::warn!(
            %user_id,
            %target,
            count = votes.len(),
            vote_ids = %vote_ids.join(","),
            "Multiple votes held by one user on one target"
        );
    }

    Ok(votes.first().map(|v| v.vote_type))
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;
    use crate::error::CoreError;
    use crate::memory::{FailPoint, MemoryVoteStore};

    fn discussion() -> VoteTarget {
        VoteTarget::Discussion(Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_fresh_vote_is_added() {
        let mut store = MemoryVoteStore::new();
        let (user, target) = (Uuid::new_v4(), discussion());

        let outcome = apply_vote(&mut store, user, target, VoteType::Upvote)
            .await
            .unwrap();

        assert_eq!(outcome.action, VoteAction::Added);
        assert_eq!(outcome.vote_type, VoteType::Upvote);
        let held = store.votes_for(user, target);
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].vote_type, VoteType::Upvote);
        assert_eq!(held[0].value, 1);
    }

    #[tokio::test]
    async fn test_repeat_vote_toggles_off() {
        let mut store = MemoryVoteStore::new();
        let (user, target) = (Uuid::new_v4(), discussion());

        apply_vote(&mut store, user, target, VoteType::Upvote)
            .await
            .unwrap();
        let outcome = apply_vote(&mut store, user, target, VoteType::Upvote)
            .await
            .unwrap();

        assert_eq!(outcome.action, VoteAction::Removed);
        assert!(store.votes_for(user, target).is_empty());
    }

    #[tokio::test]
    async fn test_opposite_vote_switches_direction() {
        let mut store = MemoryVoteStore::new();
        let (user, target) = (Uuid::new_v4(), VoteTarget::Comment(Uuid::new_v4()));

        apply_vote(&mut store, user, target, VoteType::Upvote)
            .await
            .unwrap();
        let outcome = apply_vote(&mut store, user, target, VoteType::Downvote)
            .await
            .unwrap();

        assert_eq!(outcome.action, VoteAction::Changed);
        assert_eq!(outcome.vote_type, VoteType::Downvote);
        let held = store.votes_for(user, target);
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].vote_type, VoteType::Downvote);
        assert_eq!(held[0].value, -1);
    }

    #[tokio::test]
    async fn test_added_changed_removed_sequence() {
        let mut store = MemoryVoteStore::new();
        let (user, target) = (Uuid::new_v4(), discussion());

        let first = apply_vote(&mut store, user, target, VoteType::Upvote)
            .await
            .unwrap();
        assert_eq!(first.action, VoteAction::Added);
        assert_eq!(store.votes_for(user, target).len(), 1);

        let second = apply_vote(&mut store, user, target, VoteType::Downvote)
            .await
            .unwrap();
        assert_eq!(second.action, VoteAction::Changed);
        assert_eq!(second.vote_type, VoteType::Downvote);
        let held = store.votes_for(user, target);
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].vote_type, VoteType::Downvote);

        let third = apply_vote(&mut store, user, target, VoteType::Downvote)
            .await
            .unwrap();
        assert_eq!(third.action, VoteAction::Removed);
        assert!(store.votes_for(user, target).is_empty());
    }

    #[tokio::test]
    async fn test_votes_are_scoped_per_user_and_target() {
        let mut store = MemoryVoteStore::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let id = Uuid::new_v4();
        let as_discussion = VoteTarget::Discussion(id);
        let as_comment = VoteTarget::Comment(id);

        apply_vote(&mut store, alice, as_discussion, VoteType::Upvote)
            .await
            .unwrap();
        let bob_outcome = apply_vote(&mut store, bob, as_discussion, VoteType::Upvote)
            .await
            .unwrap();
        let comment_outcome = apply_vote(&mut store, alice, as_comment, VoteType::Upvote)
            .await
            .unwrap();

        assert_eq!(bob_outcome.action, VoteAction::Added);
        assert_eq!(comment_outcome.action, VoteAction::Added);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_toggle_off_delete_keeps_vote() {
        let mut store = MemoryVoteStore::new();
        let (user, target) = (Uuid::new_v4(), discussion());
        apply_vote(&mut store, user, target, VoteType::Upvote)
            .await
            .unwrap();

        store.fail_on(FailPoint::Delete);
        let result = apply_vote(&mut store, user, target, VoteType::Upvote).await;

        assert_matches!(result, Err(CoreError::Storage(_)));
        assert_eq!(store.votes_for(user, target).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_opposite_delete_skips_insert() {
        let mut store = MemoryVoteStore::new();
        let (user, target) = (Uuid::new_v4(), discussion());
        apply_vote(&mut store, user, target, VoteType::Upvote)
            .await
            .unwrap();

        store.fail_on(FailPoint::Delete);
        let result = apply_vote(&mut store, user, target, VoteType::Downvote).await;

        assert_matches!(result, Err(CoreError::Storage(_)));
        let held = store.votes_for(user, target);
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].vote_type, VoteType::Upvote);
    }

    #[tokio::test]
    async fn test_failed_insert_after_switch_leaves_no_vote() {
        // Without a transaction the deleted opposite vote is not restored.
        let mut store = MemoryVoteStore::new();
        let (user, target) = (Uuid::new_v4(), discussion());
        apply_vote(&mut store, user, target, VoteType::Upvote)
            .await
            .unwrap();

        store.fail_on(FailPoint::Insert);
        let result = apply_vote(&mut store, user, target, VoteType::Downvote).await;

        assert_matches!(result, Err(CoreError::Storage(_)));
        assert!(store.votes_for(user, target).is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookup_touches_nothing() {
        let mut store = MemoryVoteStore::new();
        let (user, target) = (Uuid::new_v4(), discussion());

        store.fail_on(FailPoint::Find);
        let result = apply_vote(&mut store, user, target, VoteType::Upvote).await;

        assert_matches!(result, Err(CoreError::Storage(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_get_user_vote_reflects_current_direction() {
        let mut store = MemoryVoteStore::new();
        let (user, target) = (Uuid::new_v4(), discussion());

        assert_eq!(get_user_vote(&mut store, user, target).await.unwrap(), None);

        apply_vote(&mut store, user, target, VoteType::Downvote)
            .await
            .unwrap();
        assert_eq!(
            get_user_vote(&mut store, user, target).await.unwrap(),
            Some(VoteType::Downvote)
        );

        apply_vote(&mut store, user, target, VoteType::Downvote)
            .await
            .unwrap();
        assert_eq!(get_user_vote(&mut store, user, target).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_user_vote_with_duplicate_rows_returns_oldest() {
        let mut store = MemoryVoteStore::new();
        let (user, target) = (Uuid::new_v4(), discussion());

        // Bypass the reconciler to simulate a broken invariant.
        store.seed(NewVote {
            user_id: user,
            target,
            vote_type: VoteType::Downvote,
        });
        store.seed(NewVote {
            user_id: user,
            target,
            vote_type: VoteType::Upvote,
        });

        assert_eq!(
            get_user_vote(&mut store, user, target).await.unwrap(),
            Some(VoteType::Downvote)
        );
    }
}
