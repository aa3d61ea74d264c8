//! Route definitions for threaded comments.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Discussion-scoped comment routes, merged into `/discussions`.
///
/// ```text
/// GET    /{id}/comments    list_thread
/// POST   /{id}/comments    create_comment
/// ```
pub fn discussion_router() -> Router<AppState> {
    Router::new().route(
        "/{id}/comments",
        get(comments::list_thread).post(comments::create_comment),
    )
}

/// Comment routes, nested under `/comments`.
///
/// ```text
/// DELETE /{id}    delete_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(comments::delete_comment))
}
