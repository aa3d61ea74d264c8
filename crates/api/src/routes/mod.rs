pub mod comments;
pub mod discussions;
pub mod health;
pub mod votes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /communities/{id}/discussions   discussions (list, create)
/// /discussions/{id}               discussion detail
/// /discussions/{id}/comments      thread (list, create)
/// /comments/{id}                  comment delete
/// /votes                          cast, read own vote, tally
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/communities", discussions::community_router())
        .nest("/discussions", discussions::router().merge(comments::discussion_router()))
        .nest("/comments", comments::router())
        .nest("/votes", votes::router())
}
