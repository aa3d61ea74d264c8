//! Handlers for community discussions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use commons_core::discussion::{validate_body, validate_title};
use commons_core::error::CoreError;
use commons_core::types::DbId;
use commons_db::models::discussion::{CreateDiscussion, Discussion};
use commons_db::repositories::DiscussionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a discussion, returning 404 if it does not exist.
pub(crate) async fn ensure_discussion_exists(
    pool: &sqlx::PgPool,
    discussion_id: DbId,
) -> AppResult<Discussion> {
    DiscussionRepo::find_by_id(pool, discussion_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Discussion",
                id: discussion_id,
            })
        })
}

/// POST /communities/{id}/discussions
pub async fn create_discussion(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(community_id): Path<DbId>,
    Json(input): Json<CreateDiscussion>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;
    validate_body(&input.body)?;

    let discussion =
        DiscussionRepo::create(&state.pool, community_id, auth.user_id, &input).await?;

    tracing::info!(
        user_id = %auth.user_id,
        %community_id,
        discussion_id = %discussion.id,
        "Discussion created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: discussion })))
}

/// GET /communities/{id}/discussions
///
/// Newest first, paginated with `?limit=&offset=`.
pub async fn list_discussions(
    State(state): State<AppState>,
    Path(community_id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let discussions = DiscussionRepo::list_for_community(
        &state.pool,
        community_id,
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: discussions }))
}

/// GET /discussions/{id}
pub async fn get_discussion(
    State(state): State<AppState>,
    Path(discussion_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let discussion = ensure_discussion_exists(&state.pool, discussion_id).await?;
    Ok(Json(DataResponse { data: discussion }))
}
