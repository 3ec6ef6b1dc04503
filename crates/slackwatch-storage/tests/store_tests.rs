// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests driving `RemoteStorage` through the `IssueStore` trait
//! object against a mock PostgREST server.

use std::sync::Arc;

use chrono::TimeZone;
use serde_json::json;
use slackwatch_config::model::StoreConfig;
use slackwatch_core::types::{Classification, GroupId, MessageId, NewMessage};
use slackwatch_core::{IssueStore, WatchError};
use slackwatch_storage::RemoteStorage;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store(server: &MockServer) -> Arc<dyn IssueStore> {
    Arc::new(RemoteStorage::new(StoreConfig {
        url: Some(server.uri()),
        key: Some("service-key".into()),
        ..StoreConfig::default()
    }))
}

fn message_row() -> serde_json::Value {
    json!({
        "id": "m-1",
        "slack_message_id": "163000.0001",
        "user_id": "U1",
        "user_name": "ada",
        "channel_id": "C1",
        "channel_name": "support",
        "text": "export is failing",
        "thread_ts": null,
        "timestamp": "2026-01-02T03:04:05Z",
        "is_relevant": true,
        "category": "bug",
        "confidence": 0.8,
        "summary": "CSV export fails"
    })
}

fn group_row(status: &str) -> serde_json::Value {
    json!({
        "id": "g-1",
        "title": "CSV export times out",
        "summary": "Large exports fail",
        "category": "bug",
        "status": status,
        "created_at": "2026-01-02T03:04:05Z",
        "updated_at": null
    })
}

#[tokio::test]
async fn stored_message_reads_back_with_classification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/messages"))
        .and(header("Authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([message_row()])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/messages"))
        .and(query_param("id", "eq.m-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([message_row()])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/messages"))
        .and(query_param("slack_message_id", "eq.163000.0001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "m-1"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/messages"))
        .and(query_param("slack_message_id", "eq.unknown-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store(&server);
    let classification = Classification {
        is_relevant: true,
        category: "bug".into(),
        confidence: 0.8,
        summary: "CSV export fails".into(),
    };
    let id = store
        .store_message(
            &NewMessage {
                slack_message_id: "163000.0001".into(),
                user_id: "U1".into(),
                user_name: "ada".into(),
                channel_id: "C1".into(),
                channel_name: "support".into(),
                text: "export is failing".into(),
                thread_ts: None,
                timestamp: chrono::Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            },
            &classification,
        )
        .await
        .unwrap();
    assert_eq!(id, MessageId("m-1".into()));

    let message = store.get_message_by_id(&id).await.unwrap().unwrap();
    assert_eq!(message.classification, classification);

    assert!(store.message_exists("163000.0001").await.unwrap());
    assert!(!store.message_exists("unknown-id").await.unwrap());
}

#[tokio::test]
async fn closing_a_group_is_visible_on_reload() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/issue_groups"))
        .and(query_param("id", "eq.g-1"))
        .and(body_json(json!({"status": "closed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([group_row("closed")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/issue_groups"))
        .and(query_param("id", "eq.g-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([group_row("closed")])))
        .mount(&server)
        .await;

    let store = store(&server);
    let group = GroupId("g-1".into());
    let updated = store
        .update_issue_group_status(&group, "closed")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, "closed");

    let reloaded = store.get_issue_group_by_id(&group).await.unwrap().unwrap();
    assert_eq!(reloaded.status, "closed");
}

#[tokio::test]
async fn rejected_request_is_not_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "PGRST100",
            "message": "failed to parse filter",
            "details": null,
            "hint": null
        })))
        .mount(&server)
        .await;

    let err = store(&server).get_all_issue_groups().await.unwrap_err();
    assert!(!err.is_transient());
    match err {
        WatchError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("failed to parse filter"));
        }
        other => panic!("expected rejected, got {other:?}"),
    }
}
