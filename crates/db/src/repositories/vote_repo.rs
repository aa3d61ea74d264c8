//! Repository for the `votes` table and the Postgres [`VoteStore`].
//!
//! A row targets exactly one of `discussion_id` / `comment_id` (enforced by a
//! CHECK constraint), so every per-target filter is an equality on the one
//! column that matches the [`VoteTarget`] kind.

use async_trait::async_trait;
use commons_core::types::DbId;
use commons_core::vote_store::VoteStore;
use commons_core::votes::{NewVote, VoteRecord, VoteTally, VoteTarget, VoteType};
use sqlx::{PgConnection, PgPool};

use crate::models::vote::VoteRow;

/// Column list for votes queries.
const VOTE_COLUMNS: &str = "id, user_id, discussion_id, comment_id, vote_type, value, created_at";

/// The column holding the id of `target`.
fn target_column(target: VoteTarget) -> &'static str {
    match target {
        VoteTarget::Discussion(_) => "discussion_id",
        VoteTarget::Comment(_) => "comment_id",
    }
}

fn into_record(row: VoteRow) -> Result<VoteRecord, sqlx::Error> {
    VoteRecord::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Pool-level vote queries that sit outside the reconciler.
pub struct VoteRepo;

impl VoteRepo {
    /// Upvote/downvote counts and score for one target.
    pub async fn tally(pool: &PgPool, target: VoteTarget) -> Result<VoteTally, sqlx::Error> {
        let column = target_column(target);
        let query = format!(
            "SELECT COUNT(*) FILTER (WHERE value > 0) AS upvotes,
                    COUNT(*) FILTER (WHERE value < 0) AS downvotes
             FROM votes
             WHERE {column} = $1"
        );
        let (upvotes, downvotes): (i64, i64) = sqlx::query_as(&query)
            .bind(target.id())
            .fetch_one(pool)
            .await?;
        Ok(VoteTally::new(upvotes, downvotes))
    }

    /// Whether the vote target exists (discussion, or live comment).
    pub async fn target_exists(pool: &PgPool, target: VoteTarget) -> Result<bool, sqlx::Error> {
        let query = match target {
            VoteTarget::Discussion(_) => "SELECT EXISTS(SELECT 1 FROM discussions WHERE id = $1)",
            VoteTarget::Comment(_) => {
                "SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1 AND deleted_at IS NULL)"
            }
        };
        let (exists,): (bool,) = sqlx::query_as(query)
            .bind(target.id())
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    /// Serialize vote requests from one user on one target until the
    /// surrounding transaction ends.
    pub async fn lock_target(
        conn: &mut PgConnection,
        user_id: DbId,
        target: VoteTarget,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("votes:{user_id}:{target}"))
            .execute(conn)
            .await?;
        Ok(())
    }
}

/// [`VoteStore`] over a single Postgres connection, usually an open
/// transaction.
pub struct PgVoteStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgVoteStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl VoteStore for PgVoteStore<'_> {
    type Error = sqlx::Error;

    async fn find_vote(
        &mut self,
        user_id: DbId,
        target: VoteTarget,
        vote_type: VoteType,
    ) -> Result<Option<VoteRecord>, sqlx::Error> {
        let column = target_column(target);
        let query = format!(
            "SELECT {VOTE_COLUMNS} FROM votes
             WHERE user_id = $1 AND {column} = $2 AND vote_type = $3
             ORDER BY created_at ASC, id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, VoteRow>(&query)
            .bind(user_id)
            .bind(target.id())
            .bind(vote_type.as_str())
            .fetch_optional(&mut *self.conn)
            .await?
            .map(into_record)
            .transpose()
    }

    async fn list_votes(
        &mut self,
        user_id: DbId,
        target: VoteTarget,
    ) -> Result<Vec<VoteRecord>, sqlx::Error> {
        let column = target_column(target);
        let query = format!(
            "SELECT {VOTE_COLUMNS} FROM votes
             WHERE user_id = $1 AND {column} = $2
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, VoteRow>(&query)
            .bind(user_id)
            .bind(target.id())
            .fetch_all(&mut *self.conn)
            .await?
            .into_iter()
            .map(into_record)
            .collect()
    }

    async fn insert_vote(&mut self, vote: NewVote) -> Result<VoteRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO votes (user_id, discussion_id, comment_id, vote_type, value)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {VOTE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, VoteRow>(&query)
            .bind(vote.user_id)
            .bind(vote.target.discussion_id())
            .bind(vote.target.comment_id())
            .bind(vote.vote_type.as_str())
            .bind(vote.value())
            .fetch_one(&mut *self.conn)
            .await?;
        into_record(row)
    }

    async fn delete_vote(&mut self, vote_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM votes WHERE id = $1")
            .bind(vote_id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}
