//! Handlers for threaded comments.
//!
//! Comments are stored flat and threaded on every read: the discussion's
//! live comments are loaded oldest first, assembled with
//! [`build_tree`], and annotated for display with [`render_forest`].
//!
//! The response nests comments by indentation level rather than by reply
//! link: a reply past the indentation cap is listed beside its parent, so
//! the JSON never nests deeper than the cap however long a chain grows.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use commons_core::comment_tree::{build_tree, render_forest, RenderPolicy, RenderedComment};
use commons_core::discussion::{validate_comment_content, validate_reply_parent};
use commons_core::error::CoreError;
use commons_core::types::DbId;
use commons_db::models::comment::{Comment, CreateComment};
use commons_db::repositories::CommentRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::discussions::ensure_discussion_exists;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// A comment as presented in a thread.
#[derive(Debug, Serialize)]
pub struct ThreadComment {
    #[serde(flatten)]
    pub comment: Comment,
    /// Logical depth, roots are 0.
    pub depth: usize,
    /// Indentation level, capped. Equals the nesting level in the response.
    pub render_depth: usize,
    pub compact_avatar: bool,
    /// The viewer authored this comment and it is shallow enough to offer
    /// the delete action.
    pub can_delete: bool,
    pub replies: Vec<ThreadComment>,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Convert a rendered forest into the thread response for `viewer`.
fn into_threads(
    forest: Vec<RenderedComment<Comment>>,
    viewer: Option<DbId>,
) -> Vec<ThreadComment> {
    let mut built: Vec<Option<ThreadComment>> = Vec::new();
    let mut children: Vec<Vec<usize>> = Vec::new();
    // Index of the comment each entry is listed under, if any.
    let mut listed_under: Vec<Option<usize>> = Vec::new();
    let mut roots = Vec::new();
    let mut pending: Vec<(RenderedComment<Comment>, Option<usize>)> =
        forest.into_iter().rev().map(|node| (node, None)).collect();

    while let Some((node, parent)) = pending.pop() {
        let RenderedComment {
            comment,
            depth,
            render_depth,
            compact_avatar,
            delete_action,
            replies,
        } = node;

        let index = built.len();
        let under = match parent {
            Some(p) if render_depth < depth => listed_under[p],
            other => other,
        };
        match under {
            Some(u) => children[u].push(index),
            None => roots.push(index),
        }
        listed_under.push(under);
        children.push(Vec::new());
        built.push(Some(ThreadComment {
            can_delete: delete_action && viewer == Some(comment.author_id),
            comment,
            depth,
            render_depth,
            compact_avatar,
            replies: Vec::new(),
        }));

        pending.extend(replies.into_iter().rev().map(|reply| (reply, Some(index))));
    }

    for index in (0..built.len()).rev() {
        let replies: Vec<ThreadComment> = children[index]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        if let Some(node) = built[index].as_mut() {
            node.replies = replies;
        }
    }

    roots.into_iter().filter_map(|r| built[r].take()).collect()
}

async fn ensure_comment_exists(pool: &sqlx::PgPool, comment_id: DbId) -> AppResult<Comment> {
    CommentRepo::find_by_id(pool, comment_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Comment",
                id: comment_id,
            })
        })
}

/* --------------------------------------------------------------------------
Comment handlers
-------------------------------------------------------------------------- */

/// GET /discussions/{id}/comments
///
/// The discussion's comments as a rendered reply forest.
pub async fn list_thread(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(discussion_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_discussion_exists(&state.pool, discussion_id).await?;

    let comments = CommentRepo::list_for_discussion(&state.pool, discussion_id).await?;
    let count = comments.len();
    let forest = render_forest(build_tree(comments), &RenderPolicy::default());

    let thread = into_threads(forest, viewer.user_id());

    tracing::debug!(%discussion_id, count, roots = thread.len(), "Thread built");

    Ok(Json(DataResponse { data: thread }))
}

/// POST /discussions/{id}/comments
///
/// Create a top-level comment, or a reply when `parent_comment_id` is set.
pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(discussion_id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    validate_comment_content(&input.content)?;
    ensure_discussion_exists(&state.pool, discussion_id).await?;

    if let Some(parent_id) = input.parent_comment_id {
        let parent = ensure_comment_exists(&state.pool, parent_id).await?;
        validate_reply_parent(discussion_id, parent.discussion_id)?;
    }

    let comment = CommentRepo::create(&state.pool, discussion_id, auth.user_id, &input).await?;

    tracing::info!(
        user_id = %auth.user_id,
        %discussion_id,
        comment_id = %comment.id,
        parent_comment_id = ?comment.parent_comment_id,
        "Comment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// DELETE /comments/{id}
///
/// Soft-delete a comment. Only its author may delete it; replies stay and
/// are shown at the root of the thread.
pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let comment = ensure_comment_exists(&state.pool, comment_id).await?;
    if comment.author_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author can delete this comment".into(),
        )));
    }

    if !CommentRepo::soft_delete(&state.pool, comment_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }));
    }

    tracing::info!(user_id = %auth.user_id, %comment_id, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}
