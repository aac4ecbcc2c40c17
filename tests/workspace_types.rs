//! Workspace type API scenarios: the full decision sequence as observed
//! through HTTP, including failure classification and identifier uniqueness.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{error_kind, response_json, send_request, setup_test_app};

const WORKSPACE_TYPES: &str = "/api/v1/workspace-types";

#[tokio::test]
async fn create_fails_when_user_is_inactive() {
    let app = setup_test_app().await;
    let session = app.admin_session().await;

    app.deactivate_user(&session.user_id).await;

    let response = send_request(
        &app,
        Method::POST,
        WORKSPACE_TYPES,
        Some(&session.token),
        Some(json!({"id": "workspace-test-123"})),
    )
    .await;

    // Inactive trumps role: an inactive admin is unauthorized, not forbidden.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(response).await, "unauthorized");
}

#[tokio::test]
async fn create_fails_when_user_is_not_admin() {
    let app = setup_test_app().await;
    let session = app.member_session().await;

    let response = send_request(
        &app,
        Method::POST,
        WORKSPACE_TYPES,
        Some(&session.token),
        Some(json!({"id": "workspace-test-456"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_kind(response).await, "forbidden");
}

#[tokio::test]
async fn create_fails_for_anonymous_caller() {
    let app = setup_test_app().await;

    let response = send_request(
        &app,
        Method::POST,
        WORKSPACE_TYPES,
        None,
        Some(json!({"id": "workspace-test-789"})),
    )
    .await;

    // Anonymous access to a protected mutating route signals a wiring
    // defect, classified apart from an ordinary permission failure.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_kind(response).await, "bad_implementation");
}

#[tokio::test]
async fn create_fails_when_payload_has_undeclared_field() {
    let app = setup_test_app().await;
    let session = app.admin_session().await;

    let response = send_request(
        &app,
        Method::POST,
        WORKSPACE_TYPES,
        Some(&session.token),
        Some(json!({"id": "workspace-test-abc", "invalid": "data"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(response).await, "bad_request");
}

#[tokio::test]
async fn create_succeeds_for_admin_and_echoes_id() {
    let app = setup_test_app().await;
    let session = app.admin_session().await;

    let response = send_request(
        &app,
        Method::POST,
        WORKSPACE_TYPES,
        Some(&session.token),
        Some(json!({"id": "workspace-test-xyz", "name": "Sandbox", "description": "Play area"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["id"], "workspace-test-xyz");
    assert_eq!(body["name"], "Sandbox");
    assert_eq!(body["createdBy"], session.user_id.as_str());
}

#[tokio::test]
async fn create_rejects_malformed_and_expired_tokens() {
    let app = setup_test_app().await;

    let response = send_request(
        &app,
        Method::POST,
        WORKSPACE_TYPES,
        Some("not-a-session-token"),
        Some(json!({"id": "workspace-test-bad-token"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(response).await, "unauthorized");

    let stale = app.expired_session().await;
    let response = send_request(
        &app,
        Method::POST,
        WORKSPACE_TYPES,
        Some(&stale.token),
        Some(json!({"id": "workspace-test-stale"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(response).await, "unauthorized");
}

#[tokio::test]
async fn create_rejects_non_object_body() {
    let app = setup_test_app().await;
    let session = app.admin_session().await;

    let response = send_request(
        &app,
        Method::POST,
        WORKSPACE_TYPES,
        Some(&session.token),
        Some(json!("just a string")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(response).await, "bad_request");
}

#[tokio::test]
async fn duplicate_identifier_yields_conflict() {
    let app = setup_test_app().await;
    let session = app.admin_session().await;
    let body = json!({"id": "workspace-test-dup"});

    let first = send_request(
        &app,
        Method::POST,
        WORKSPACE_TYPES,
        Some(&session.token),
        Some(body.clone()),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second =
        send_request(&app, Method::POST, WORKSPACE_TYPES, Some(&session.token), Some(body)).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(error_kind(second).await, "conflict");
}

#[tokio::test]
async fn concurrent_creates_with_same_id_have_exactly_one_winner() {
    let app = setup_test_app().await;
    let session = app.admin_session().await;
    let body = json!({"id": "workspace-test-race"});

    let (left, right) = tokio::join!(
        send_request(&app, Method::POST, WORKSPACE_TYPES, Some(&session.token), Some(body.clone())),
        send_request(&app, Method::POST, WORKSPACE_TYPES, Some(&session.token), Some(body)),
    );

    let mut statuses = [left.status(), right.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[tokio::test]
async fn reads_are_open_to_members() {
    let app = setup_test_app().await;
    let admin = app.admin_session().await;
    let member = app.member_session().await;

    send_request(
        &app,
        Method::POST,
        WORKSPACE_TYPES,
        Some(&admin.token),
        Some(json!({"id": "readable-type"})),
    )
    .await;

    let response =
        send_request(&app, Method::GET, WORKSPACE_TYPES, Some(&member.token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["workspaceTypes"].as_array().expect("list").len(), 1);

    let response = send_request(
        &app,
        Method::GET,
        "/api/v1/workspace-types/readable-type",
        Some(&member.token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["id"], "readable-type");
}

#[tokio::test]
async fn anonymous_reads_of_protected_routes_are_flagged() {
    let app = setup_test_app().await;

    let response = send_request(&app, Method::GET, WORKSPACE_TYPES, None, None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_kind(response).await, "bad_implementation");
}

#[tokio::test]
async fn get_missing_workspace_type_is_not_found() {
    let app = setup_test_app().await;
    let session = app.member_session().await;

    let response = send_request(
        &app,
        Method::GET,
        "/api/v1/workspace-types/absent",
        Some(&session.token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_kind(response).await, "not_found");
}

#[tokio::test]
async fn delete_is_admin_only_and_idempotence_is_refused() {
    let app = setup_test_app().await;
    let admin = app.admin_session().await;
    let member = app.member_session().await;

    send_request(
        &app,
        Method::POST,
        WORKSPACE_TYPES,
        Some(&admin.token),
        Some(json!({"id": "doomed-type"})),
    )
    .await;

    let response = send_request(
        &app,
        Method::DELETE,
        "/api/v1/workspace-types/doomed-type",
        Some(&member.token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send_request(
        &app,
        Method::DELETE,
        "/api/v1/workspace-types/doomed-type",
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send_request(
        &app,
        Method::DELETE,
        "/api/v1/workspace-types/doomed-type",
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_is_reachable_without_credentials() {
    let app = setup_test_app().await;

    let response = send_request(&app, Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
}
