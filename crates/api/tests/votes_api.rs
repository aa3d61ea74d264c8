//! Vote endpoint tests for paths that resolve before the database.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{bearer, build_test_app, get, post_json, send, unreachable_pool};

#[tokio::test]
async fn cast_vote_without_token_returns_401() {
    let app = build_test_app(unreachable_pool());
    let body = json!({
        "targetId": Uuid::new_v4(),
        "targetType": "discussion",
        "voteType": "upvote",
    });

    let (status, json) = send(app, post_json("/api/v1/votes", None, body)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn cast_vote_with_garbage_token_returns_401() {
    let app = build_test_app(unreachable_pool());
    let body = json!({
        "targetId": Uuid::new_v4(),
        "targetType": "comment",
        "voteType": "downvote",
    });

    let (status, json) =
        send(app, post_json("/api/v1/votes", Some("Bearer not-a-jwt"), body)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid or expired token");
}

#[tokio::test]
async fn cast_vote_missing_target_id_returns_400() {
    let app = build_test_app(unreachable_pool());
    let auth = bearer(Uuid::new_v4());
    let body = json!({ "targetType": "discussion", "voteType": "upvote" });

    let (status, json) = send(app, post_json("/api/v1/votes", Some(&auth), body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("targetId"));
}

#[tokio::test]
async fn cast_vote_unknown_vote_type_returns_400() {
    let app = build_test_app(unreachable_pool());
    let auth = bearer(Uuid::new_v4());
    let body = json!({
        "targetId": Uuid::new_v4(),
        "targetType": "discussion",
        "voteType": "sideways",
    });

    let (status, json) = send(app, post_json("/api/v1/votes", Some(&auth), body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("sideways"));
}

#[tokio::test]
async fn cast_vote_unknown_target_type_returns_400() {
    let app = build_test_app(unreachable_pool());
    let auth = bearer(Uuid::new_v4());
    let body = json!({
        "targetId": Uuid::new_v4(),
        "targetType": "community",
        "voteType": "upvote",
    });

    let (status, json) = send(app, post_json("/api/v1/votes", Some(&auth), body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn get_vote_anonymous_returns_null() {
    let app = build_test_app(unreachable_pool());
    let uri = format!("/api/v1/votes?targetId={}&targetType=discussion", Uuid::new_v4());

    let (status, json) = send(app, get(&uri, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "userVote": null }));
}

#[tokio::test]
async fn get_vote_with_invalid_token_degrades_to_anonymous() {
    let app = build_test_app(unreachable_pool());
    let uri = format!("/api/v1/votes?targetId={}&targetType=comment", Uuid::new_v4());

    let (status, json) = send(app, get(&uri, Some("Bearer expired.or.forged"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["userVote"], serde_json::Value::Null);
}

#[tokio::test]
async fn get_vote_with_malformed_target_id_returns_400() {
    let app = build_test_app(unreachable_pool());

    let (status, json) =
        send(app, get("/api/v1/votes?targetId=abc&targetType=discussion", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn tally_missing_target_type_returns_400() {
    let app = build_test_app(unreachable_pool());
    let uri = format!("/api/v1/votes/tally?targetId={}", Uuid::new_v4());

    let (status, json) = send(app, get(&uri, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("targetType"));
}
