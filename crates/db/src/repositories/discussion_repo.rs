//! Repository for the `discussions` table.

use commons_core::types::DbId;
use sqlx::PgPool;

use crate::models::discussion::{CreateDiscussion, Discussion};

/// Column list for discussion queries, scored from the `votes` table.
const DISCUSSION_COLUMNS: &str = "d.id, d.community_id, d.author_id, d.title, d.body, \
    d.metadata, \
    COALESCE((SELECT SUM(v.value) FROM votes v WHERE v.discussion_id = d.id), 0)::BIGINT AS score, \
    d.created_at, d.updated_at";

pub struct DiscussionRepo;

impl DiscussionRepo {
    /// Create a discussion in `community_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        community_id: DbId,
        author_id: DbId,
        input: &CreateDiscussion,
    ) -> Result<Discussion, sqlx::Error> {
        let query = format!(
            "WITH d AS (
                INSERT INTO discussions (community_id, author_id, title, body, metadata)
                VALUES ($1, $2, $3, $4, COALESCE($5, '{{}}'::jsonb))
                RETURNING *
             )
             SELECT {DISCUSSION_COLUMNS} FROM d"
        );
        sqlx::query_as::<_, Discussion>(&query)
            .bind(community_id)
            .bind(author_id)
            .bind(input.title.trim())
            .bind(&input.body)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Discussion>, sqlx::Error> {
        let query = format!("SELECT {DISCUSSION_COLUMNS} FROM discussions d WHERE d.id = $1");
        sqlx::query_as::<_, Discussion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a community's discussions, newest first.
    pub async fn list_for_community(
        pool: &PgPool,
        community_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Discussion>, sqlx::Error> {
        let query = format!(
            "SELECT {DISCUSSION_COLUMNS} FROM discussions d
             WHERE d.community_id = $1
             ORDER BY d.created_at DESC, d.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Discussion>(&query)
            .bind(community_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
