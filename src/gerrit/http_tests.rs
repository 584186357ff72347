//! Client and interpreter tests against a local mock Gerrit.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use crate::config::GerritConfig;
use crate::credentials::Credentials;
use crate::effects::{GerritEffect, GerritInterpreter, GerritResponse};
use crate::types::{ChangeId, ChangeNumber, ChangeRef, RevisionNumber};

use super::{GerritClient, GerritErrorKind, RetryConfig};

// ─── Test Helpers ───

fn client_for(server: &MockServer, retry: RetryConfig) -> GerritClient {
    let config = GerritConfig {
        url: server.base_url(),
        request_timeout: Duration::from_secs(5),
        retry,
    };
    GerritClient::new(&config, Credentials::new("alice", "hunter2")).unwrap()
}

fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig::new(
        max_retries,
        Duration::from_millis(1),
        Duration::from_millis(5),
        2.0,
    )
}

fn change(n: u64) -> ChangeRef {
    ChangeRef::from(ChangeNumber(n))
}

// "alice:hunter2"
const BASIC_AUTH: &str = "Basic YWxpY2U6aHVudGVyMg==";

// ─── Queries ───

#[tokio::test]
async fn get_change_sends_basic_auth_and_strips_xssi() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/a/changes/12345")
                .query_param("o", "CURRENT_REVISION")
                .header("Authorization", BASIC_AUTH);
            then.status(200).body(
                ")]}'\n{\"change_id\": \"Iroot\", \"_number\": 12345, \
                 \"subject\": \"Fix the thing\", \"current_revision_number\": 3}",
            );
        })
        .await;

    let client = client_for(&server, RetryConfig::NONE);
    let summary = client.get_change(&change(12345)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(summary.id, ChangeId::new("Iroot"));
    assert_eq!(summary.current_revision, RevisionNumber(3));
    assert_eq!(summary.subject, "Fix the thing");
}

#[tokio::test]
async fn related_changes_are_fetched_for_the_given_revision() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/a/changes/12345/revisions/3/related");
            then.status(200).body(
                ")]}'\n{\"changes\": [\
                 {\"change_id\": \"Ichild\", \"_change_number\": 12346, \"status\": \"NEW\"},\
                 {\"change_id\": \"Iroot\", \"_change_number\": 12345, \"status\": \"NEW\"},\
                 {\"change_id\": \"Iparent\", \"_change_number\": 12344, \"status\": \"NEW\"}]}",
            );
        })
        .await;

    let client = client_for(&server, RetryConfig::NONE);
    let related = client
        .get_related_changes(&change(12345), RevisionNumber(3))
        .await
        .unwrap();

    mock.assert_async().await;
    let ids: Vec<_> = related.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["Ichild", "Iroot", "Iparent"]);
}

#[tokio::test]
async fn change_detail_decodes_labels_and_messages() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/a/changes/Iroot/detail");
            then.status(200).body(
                ")]}'\n{\"change_id\": \"Iroot\", \"subject\": \"Fix\", \
                 \"labels\": {\"Verified\": {\"all\": [{\"name\": \"Zuul\", \"value\": -1, \
                 \"date\": \"2024-03-04 10:00:00.000000000\"}]}}, \
                 \"messages\": [{\"id\": \"m1\", \"author\": {\"name\": \"Zuul\"}, \
                 \"date\": \"2024-03-04 10:00:00.000000000\", \
                 \"tag\": \"autogenerated:zuul:check\", \"message\": \"Build failed.\"}]}",
            );
        })
        .await;

    let client = client_for(&server, RetryConfig::NONE);
    let detail = client
        .get_change_detail(&ChangeRef::from(&ChangeId::new("Iroot")))
        .await
        .unwrap();

    assert_eq!(detail.labels["Verified"].vote_by("Zuul").unwrap().value, -1);
    assert_eq!(detail.messages.len(), 1);
    assert!(detail.messages[0].has_tag_prefix("autogenerated:zuul:"));
}

// ─── Mutations ───

#[tokio::test]
async fn post_review_targets_current_revision() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/a/changes/12345/revisions/current/review")
                .header("Authorization", BASIC_AUTH)
                .json_body(json!({ "message": "recheck" }));
            then.status(200).body(")]}'\n{\"labels\": {}}");
        })
        .await;

    let client = client_for(&server, RetryConfig::NONE);
    client
        .post_review(&change(12345), "recheck")
        .await
        .unwrap();

    mock.assert_async().await;
}

// ─── Errors ───

#[tokio::test]
async fn not_found_is_permanent_and_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/a/changes/999");
            then.status(404).body("Not found: 999");
        })
        .await;

    let client = client_for(&server, fast_retry(3));
    let err = client
        .interpret(GerritEffect::GetChange { change: change(999) })
        .await
        .unwrap_err();

    mock.assert_hits_async(1).await;
    assert_eq!(err.kind, GerritErrorKind::Permanent);
    assert_eq!(err.status_code, Some(404));
    assert!(err.message.contains("Not found: 999"));
}

#[tokio::test]
async fn server_errors_are_retried_until_exhausted() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/a/changes/1/detail");
            then.status(503).body("Service Unavailable");
        })
        .await;

    let client = client_for(&server, fast_retry(2));
    let err = client
        .interpret(GerritEffect::GetChangeDetail { change: change(1) })
        .await
        .unwrap_err();

    mock.assert_hits_async(3).await;
    assert_eq!(err.kind, GerritErrorKind::Transient);
    assert_eq!(err.status_code, Some(503));
}

#[tokio::test]
async fn malformed_json_is_permanent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/a/changes/1");
            then.status(200).body(")]}'\n<html>login</html>");
        })
        .await;

    let client = client_for(&server, fast_retry(3));
    let err = client
        .interpret(GerritEffect::GetChange { change: change(1) })
        .await
        .unwrap_err();

    mock.assert_hits_async(1).await;
    assert_eq!(err.kind, GerritErrorKind::Permanent);
    assert!(err.message.contains("invalid response body"));
}

#[tokio::test]
async fn interpreter_maps_post_review_to_review_posted() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/a/changes/7/revisions/current/review");
            then.status(200).body(")]}'\n{}");
        })
        .await;

    let client = client_for(&server, RetryConfig::NONE);
    let response = client
        .interpret(GerritEffect::PostReview {
            change: change(7),
            message: "recheck".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response, GerritResponse::ReviewPosted);
}

#[tokio::test]
async fn timed_out_review_is_not_resent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/a/changes/7/revisions/current/review");
            then.status(200)
                .delay(Duration::from_millis(400))
                .body(")]}'\n{}");
        })
        .await;

    let config = GerritConfig {
        url: server.base_url(),
        request_timeout: Duration::from_millis(100),
        retry: fast_retry(3),
    };
    let client = GerritClient::new(&config, Credentials::new("alice", "hunter2")).unwrap();
    let err = client
        .interpret(GerritEffect::PostReview {
            change: change(7),
            message: "recheck".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, GerritErrorKind::Transient);
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn failed_review_is_not_retried_on_server_error() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/a/changes/7/revisions/current/review");
            then.status(503).body("Service Unavailable");
        })
        .await;

    let client = client_for(&server, fast_retry(3));
    let err = client
        .interpret(GerritEffect::PostReview {
            change: change(7),
            message: "recheck".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status_code, Some(503));
    mock.assert_hits_async(1).await;
}
