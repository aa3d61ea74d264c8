//! Route definitions for discussions.

use axum::routing::get;
use axum::Router;

use crate::handlers::discussions;
use crate::state::AppState;

/// Community-scoped discussion routes, nested under `/communities`.
///
/// ```text
/// GET    /{id}/discussions    list_discussions
/// POST   /{id}/discussions    create_discussion
/// ```
pub fn community_router() -> Router<AppState> {
    Router::new().route(
        "/{id}/discussions",
        get(discussions::list_discussions).post(discussions::create_discussion),
    )
}

/// Discussion routes, nested under `/discussions`.
///
/// ```text
/// GET    /{id}    get_discussion
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(discussions::get_discussion))
}
