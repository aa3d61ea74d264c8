//! Repository for the `comments` table.
//!
//! Deletion is soft: `deleted_at` is stamped and every read filters it out.

use commons_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};

/// Column list for comment queries, scored from the `votes` table.
const COMMENT_COLUMNS: &str = "c.id, c.discussion_id, c.author_id, c.parent_comment_id, \
    c.content, c.metadata, \
    COALESCE((SELECT SUM(v.value) FROM votes v WHERE v.comment_id = c.id), 0)::BIGINT AS score, \
    c.created_at, c.updated_at";

pub struct CommentRepo;

impl CommentRepo {
    /// Create a comment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        discussion_id: DbId,
        author_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                INSERT INTO comments (discussion_id, author_id, parent_comment_id, content, metadata)
                VALUES ($1, $2, $3, $4, COALESCE($5, '{{}}'::jsonb))
                RETURNING *
             )
             SELECT {COMMENT_COLUMNS} FROM c"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(discussion_id)
            .bind(author_id)
            .bind(input.parent_comment_id)
            .bind(input.content.trim())
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Find a live comment by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c
             WHERE c.id = $1 AND c.deleted_at IS NULL"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All live comments of a discussion as a flat list, oldest first.
    pub async fn list_for_discussion(
        pool: &PgPool,
        discussion_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c
             WHERE c.discussion_id = $1 AND c.deleted_at IS NULL
             ORDER BY c.created_at ASC, c.id ASC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(discussion_id)
            .fetch_all(pool)
            .await
    }

    /// Soft-delete a comment. Returns `true` if a live row was stamped.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE comments SET deleted_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
