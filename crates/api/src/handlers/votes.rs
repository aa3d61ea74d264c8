//! Handlers for casting and reading votes on discussions and comments.
//!
//! Each cast runs the reconciler inside one transaction that first takes an
//! advisory lock on `(user, target)`, so concurrent requests from the same
//! user on the same target are applied one after another and a failure at
//! any step rolls back the whole toggle or switch.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use commons_core::error::CoreError;
use commons_core::reconciler::{apply_vote, get_user_vote};
use commons_core::votes::{
    validate_target_id, validate_target_type, validate_vote_request, VoteAction, VoteTarget,
    VoteType,
};
use commons_db::repositories::{PgVoteStore, VoteRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::VoteTargetParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /votes`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub target_id: Option<String>,
    pub target_type: Option<String>,
    pub vote_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteResponse {
    pub success: bool,
    pub action: VoteAction,
    pub vote_type: VoteType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVoteResponse {
    pub user_vote: Option<VoteType>,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

fn parse_target(params: &VoteTargetParams) -> AppResult<VoteTarget> {
    let id = validate_target_id(params.target_id.as_deref())?;
    let kind = validate_target_type(params.target_type.as_deref())?;
    Ok(VoteTarget::new(kind, id))
}

async fn ensure_target_exists(pool: &sqlx::PgPool, target: VoteTarget) -> AppResult<()> {
    if VoteRepo::target_exists(pool, target).await? {
        return Ok(());
    }
    let entity = match target {
        VoteTarget::Discussion(_) => "Discussion",
        VoteTarget::Comment(_) => "Comment",
    };
    Err(AppError::Core(CoreError::NotFound {
        entity,
        id: target.id(),
    }))
}

/* --------------------------------------------------------------------------
Vote handlers
-------------------------------------------------------------------------- */

/// POST /votes
///
/// Toggle, add, or switch the caller's vote on a discussion or comment.
pub async fn cast_vote(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CastVoteRequest>,
) -> AppResult<impl IntoResponse> {
    let (target, vote_type) = validate_vote_request(
        input.target_id.as_deref(),
        input.target_type.as_deref(),
        input.vote_type.as_deref(),
    )?;
    ensure_target_exists(&state.pool, target).await?;

    let mut tx = state.pool.begin().await?;
    VoteRepo::lock_target(&mut tx, auth.user_id, target).await?;
    let mut store = PgVoteStore::new(&mut tx);
    let outcome = apply_vote(&mut store, auth.user_id, target, vote_type).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = %auth.user_id,
        %target,
        %vote_type,
        action = ?outcome.action,
        "Vote applied"
    );

    Ok(Json(CastVoteResponse {
        success: true,
        action: outcome.action,
        vote_type: outcome.vote_type,
    }))
}

/// GET /votes?targetId=&targetType=
///
/// The caller's current direction on a target. Anonymous callers get `null`.
pub async fn get_vote(
    maybe_auth: MaybeAuthUser,
    State(state): State<AppState>,
    Query(params): Query<VoteTargetParams>,
) -> AppResult<impl IntoResponse> {
    let target = parse_target(&params)?;

    let Some(user_id) = maybe_auth.user_id() else {
        return Ok(Json(UserVoteResponse { user_vote: None }));
    };

    let mut conn = state.pool.acquire().await?;
    let user_vote = get_user_vote(&mut PgVoteStore::new(&mut conn), user_id, target).await?;

    Ok(Json(UserVoteResponse { user_vote }))
}

/// GET /votes/tally?targetId=&targetType=
///
/// Upvote and downvote counts with the resulting score.
pub async fn get_tally(
    State(state): State<AppState>,
    Query(params): Query<VoteTargetParams>,
) -> AppResult<impl IntoResponse> {
    let target = parse_target(&params)?;
    let tally = VoteRepo::tally(&state.pool, target).await?;
    Ok(Json(DataResponse { data: tally }))
}
