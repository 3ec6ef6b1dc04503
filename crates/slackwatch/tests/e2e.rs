// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: envelopes through the monitor loop into a mock PostgREST
//! server, using the same store adapter `serve` uses.

use std::sync::Arc;

use serde_json::json;
use slackwatch_config::model::StoreConfig;
use slackwatch_core::types::{Classification, GroupAssignment, GroupId, IngestEnvelope, MessageEvent};
use slackwatch_monitor::MonitorLoop;
use slackwatch_storage::{LenientStore, RemoteStorage};
use slackwatch_test_utils::MockSource;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TS: &str = "1630000000.000100";

fn storage(server: &MockServer) -> Arc<RemoteStorage> {
    Arc::new(RemoteStorage::new(StoreConfig {
        url: Some(server.uri()),
        key: Some("service-key".into()),
        ..StoreConfig::default()
    }))
}

fn envelope(group: Option<GroupAssignment>) -> IngestEnvelope {
    IngestEnvelope {
        event: MessageEvent {
            user: Some("U1".into()),
            text: Some("CSV export times out for big workspaces".into()),
            channel: Some("C1".into()),
            ts: TS.into(),
            ..MessageEvent::default()
        },
        user_name: Some("ada".into()),
        channel_name: Some("support".into()),
        classification: Some(Classification {
            is_relevant: true,
            category: "bug".into(),
            confidence: 0.91,
            summary: "CSV export timeout".into(),
        }),
        group,
    }
}

fn stored_row() -> serde_json::Value {
    json!({
        "id": "m-1",
        "slack_message_id": TS,
        "user_id": "U1",
        "user_name": "ada",
        "channel_id": "C1",
        "channel_name": "support",
        "text": "CSV export times out for big workspaces",
        "thread_ts": null,
        "timestamp": "2021-08-26T17:46:40.000100Z",
        "is_relevant": true,
        "category": "bug",
        "confidence": 0.91,
        "summary": "CSV export timeout"
    })
}

async fn run(server: &MockServer, envelopes: Vec<IngestEnvelope>) -> slackwatch_monitor::MonitorStats {
    let source = Arc::new(MockSource::with_events(envelopes).await);
    let mut monitor = MonitorLoop::new(source, storage(server));
    monitor.run(CancellationToken::new()).await.unwrap()
}

// ---- New message: existence check, insert, group link ----

#[tokio::test]
async fn new_message_is_stored_and_grouped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/messages"))
        .and(query_param("slack_message_id", format!("eq.{TS}")))
        .and(header("apikey", "service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/messages"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({
            "slack_message_id": TS,
            "user_name": "ada",
            "channel_name": "support",
            "category": "bug"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored_row()])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/message_groups"))
        .and(body_json(json!({
            "message_id": "m-1",
            "group_id": "g-1",
            "similarity_score": 0.87
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let stats = run(
        &server,
        vec![envelope(Some(GroupAssignment {
            group_id: GroupId("g-1".into()),
            similarity_score: Some(0.87),
        }))],
    )
    .await;

    assert_eq!(stats.stored, 1);
    assert_eq!(stats.grouped, 1);
    assert_eq!(stats.failed, 0);
}

// ---- Duplicate delivery ----

#[tokio::test]
async fn known_message_is_not_inserted_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "m-1"}])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored_row()])))
        .expect(0)
        .mount(&server)
        .await;

    let stats = run(&server, vec![envelope(None)]).await;
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.stored, 0);
}

// ---- Store outage ----

#[tokio::test]
async fn outage_skips_insert_and_keeps_running() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored_row()])))
        .expect(0)
        .mount(&server)
        .await;

    let stats = run(&server, vec![envelope(None), envelope(None)]).await;
    assert_eq!(stats.received, 2);
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.stored, 0);
}

#[tokio::test]
async fn lenient_existence_check_reads_outage_as_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let lenient = LenientStore::new(storage(&server));
    assert!(!lenient.message_exists(TS).await);
    assert!(lenient.get_all_issue_groups().await.is_empty());
}

// ---- Dashboard reads ----

#[tokio::test]
async fn group_members_round_trip_through_rest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/message_groups"))
        .and(query_param("select", "*,messages(*)"))
        .and(query_param("group_id", "eq.g-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"message_id": "m-1", "group_id": "g-1", "similarity_score": 0.87, "messages": stored_row()}
        ])))
        .mount(&server)
        .await;

    let lenient = LenientStore::new(storage(&server));
    let members = lenient.get_messages_in_group(&GroupId("g-1".into())).await;
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].message.slack_message_id, TS);
    assert_eq!(members[0].similarity_score, Some(0.87));
    assert_eq!(members[0].message.classification.confidence, 0.91);
}
