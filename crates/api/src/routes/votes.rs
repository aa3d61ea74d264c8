//! Route definitions for votes.

use axum::routing::get;
use axum::Router;

use crate::handlers::votes;
use crate::state::AppState;

/// Vote routes, nested under `/votes`.
///
/// ```text
/// POST   /         cast_vote
/// GET    /         get_vote     (?targetId=&targetType=)
/// GET    /tally    get_tally    (?targetId=&targetType=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(votes::get_vote).post(votes::cast_vote))
        .route("/tally", get(votes::get_tally))
}
