// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the hosted datastore's PostgREST interface.
//!
//! [`StoreClient`] owns authentication headers and the transport timeout;
//! [`TableQuery`] builds one table call (filter by equality, order by one
//! column) and maps HTTP failures onto [`WatchError`].

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use slackwatch_config::model::StoreConfig;
use slackwatch_core::WatchError;
use tracing::debug;

/// Path of the REST interface below the project URL.
const REST_PATH: &str = "rest/v1/";

/// PostgREST error body.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<String>,
    message: String,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Authenticated handle to the remote datastore.
///
/// Cheap to clone; `reqwest::Client` shares its connection pool between clones.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    rest_url: Url,
}

impl StoreClient {
    /// Creates a client for `url` authenticated with `key`.
    ///
    /// Fails with [`WatchError::Config`] when the URL does not parse or the key
    /// cannot be used as a header value.
    pub fn new(url: &str, key: &str, timeout: Duration) -> Result<Self, WatchError> {
        let base = Url::parse(url.trim())
            .map_err(|e| WatchError::Config(format!("invalid store.url `{url}`: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(WatchError::Config(format!(
                "store.url `{url}` cannot be used as a base URL"
            )));
        }
        // Ensure the trailing slash so `join` appends instead of replacing the last segment.
        let mut base = base;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rest_url = base
            .join(REST_PATH)
            .map_err(|e| WatchError::Config(format!("invalid store.url `{url}`: {e}")))?;

        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(key)
            .map_err(|e| WatchError::Config(format!("invalid store.key header value: {e}")))?;
        key_value.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| WatchError::Config(format!("invalid store.key header value: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", key_value);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| WatchError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, rest_url })
    }

    /// Creates a client from the `[store]` config section.
    ///
    /// Both `store.url` and `store.key` are required.
    pub fn from_config(config: &StoreConfig) -> Result<Self, WatchError> {
        let url = config
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                WatchError::Config("store.url is required (set SUPABASE_URL)".into())
            })?;
        let key = config
            .key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                WatchError::Config("store.key is required (set SUPABASE_KEY)".into())
            })?;
        Self::new(url, key, Duration::from_secs(config.timeout_secs))
    }

    /// The REST root every table URL is built from.
    pub fn rest_url(&self) -> &Url {
        &self.rest_url
    }

    /// Starts a query against `table`.
    pub fn table(&self, table: &str) -> TableQuery<'_> {
        TableQuery {
            client: self,
            table: table.to_string(),
            select: None,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }
}

/// A single table call under construction.
#[derive(Debug)]
pub struct TableQuery<'a> {
    client: &'a StoreClient,
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
    limit: Option<u32>,
}

impl TableQuery<'_> {
    /// Columns (and embedded resources) to return, e.g. `*, messages(*)`.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    /// Keep only rows where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Order by `column`, ascending unless `desc`.
    pub fn order(mut self, column: &str, desc: bool) -> Self {
        self.order = Some((column.to_string(), desc));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Runs a select and decodes the returned rows.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, WatchError> {
        let url = self.url()?;
        let request = self.client.http.request(Method::GET, url);
        let body = send(request, &self.table).await?;
        decode_rows(&body, &self.table)
    }

    /// Inserts `row` and returns the stored representation.
    pub async fn insert<B, T>(self, row: &B) -> Result<Vec<T>, WatchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url()?;
        let request = self
            .client
            .http
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(row);
        let body = send(request, &self.table).await?;
        decode_rows(&body, &self.table)
    }

    /// Applies `patch` to every row matching the filters and returns the updated rows.
    pub async fn update<B, T>(self, patch: &B) -> Result<Vec<T>, WatchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url()?;
        let request = self
            .client
            .http
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(patch);
        let body = send(request, &self.table).await?;
        decode_rows(&body, &self.table)
    }

    fn url(&self) -> Result<Url, WatchError> {
        let mut url = self
            .client
            .rest_url
            .join(&self.table)
            .map_err(|e| WatchError::Internal(format!("invalid table name `{}`: {e}", self.table)))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(select) = &self.select {
                pairs.append_pair("select", select);
            }
            for (column, condition) in &self.filters {
                pairs.append_pair(column, condition);
            }
            if let Some((column, desc)) = &self.order {
                let direction = if *desc { "desc" } else { "asc" };
                pairs.append_pair("order", &format!("{column}.{direction}"));
            }
            if let Some(limit) = self.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        Ok(url)
    }
}

/// Sends the request and returns the body of a successful response.
async fn send(request: reqwest::RequestBuilder, table: &str) -> Result<String, WatchError> {
    let response = request.send().await.map_err(|e| WatchError::Transient {
        message: format!("request to `{table}` failed: {e}"),
        source: Some(Box::new(e)),
    })?;

    let status = response.status();
    debug!(table, status = %status, "store response received");

    let body = response.text().await.map_err(|e| WatchError::Transient {
        message: format!("failed to read `{table}` response body: {e}"),
        source: Some(Box::new(e)),
    })?;

    if status.is_success() {
        return Ok(body);
    }

    let message = describe_error(status, &body);
    if is_transient_status(status) {
        Err(WatchError::Transient {
            message,
            source: None,
        })
    } else {
        Err(WatchError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

fn decode_rows<T: DeserializeOwned>(body: &str, table: &str) -> Result<Vec<T>, WatchError> {
    // `return=minimal` and some PATCH paths answer with an empty body.
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body).map_err(|e| WatchError::Storage {
        source: format!("failed to decode `{table}` rows: {e}").into(),
    })
}

/// Folds a PostgREST error body into one line; falls back to the raw body.
fn describe_error(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(err) => {
            let mut message = match err.code {
                Some(code) => format!("{code}: {}", err.message),
                None => err.message,
            };
            if let Some(details) = err.details.filter(|d| !d.is_empty()) {
                message.push_str(&format!(" ({details})"));
            }
            if let Some(hint) = err.hint.filter(|h| !h.is_empty()) {
                message.push_str(&format!(" hint: {hint}"));
            }
            message
        }
        Err(_) if body.trim().is_empty() => format!("store returned {status}"),
        Err(_) => format!("store returned {status}: {body}"),
    }
}

/// Timeouts, rate limiting, and server-side failures are worth retrying later.
fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
    }

    fn test_client(uri: &str) -> StoreClient {
        StoreClient::new(uri, "test-key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn rest_url_appends_rest_path() {
        let client = test_client("https://abc.supabase.co");
        assert_eq!(client.rest_url().as_str(), "https://abc.supabase.co/rest/v1/");

        let nested = test_client("http://localhost:54321/proxy");
        assert_eq!(nested.rest_url().as_str(), "http://localhost:54321/proxy/rest/v1/");
    }

    #[test]
    fn malformed_url_is_config_error() {
        let err = StoreClient::new("not a url", "k", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, WatchError::Config(_)), "got {err:?}");
    }

    #[test]
    fn missing_url_or_key_is_config_error() {
        let mut config = StoreConfig::default();
        config.key = Some("k".into());
        let err = StoreClient::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("store.url"));

        config.url = Some("https://abc.supabase.co".into());
        config.key = None;
        let err = StoreClient::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("store.key"));
    }

    #[tokio::test]
    async fn fetch_sends_auth_headers_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/messages"))
            .and(header("apikey", "test-key"))
            .and(header("authorization", "Bearer test-key"))
            .and(query_param("select", "id"))
            .and(query_param("thread_ts", "eq.1630000000.000100"))
            .and(query_param("order", "timestamp.asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "m1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let rows: Vec<Row> = test_client(&server.uri())
            .table("messages")
            .select("id")
            .eq("thread_ts", "1630000000.000100")
            .order("timestamp", false)
            .fetch()
            .await
            .unwrap();
        assert_eq!(rows, vec![Row { id: "m1".into() }]);
    }

    #[tokio::test]
    async fn insert_asks_for_representation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/issue_groups"))
            .and(header("prefer", "return=representation"))
            .and(body_json(json!({"title": "t"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{"id": "g1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let rows: Vec<Row> = test_client(&server.uri())
            .table("issue_groups")
            .insert(&json!({"title": "t"}))
            .await
            .unwrap();
        assert_eq!(rows[0].id, "g1");
    }

    #[tokio::test]
    async fn server_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .table("messages")
            .fetch::<Row>()
            .await
            .unwrap_err();
        assert!(err.is_transient(), "got {err:?}");
        assert!(err.to_string().contains("upstream down"));
    }

    #[tokio::test]
    async fn constraint_violation_is_rejected_with_postgrest_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "message": "duplicate key value violates unique constraint",
                "details": "Key (slack_message_id)=(1.2) already exists.",
                "hint": null
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .table("messages")
            .insert::<_, Row>(&json!({"slack_message_id": "1.2"}))
            .await
            .unwrap_err();
        match err {
            WatchError::Rejected { status, message } => {
                assert_eq!(status, 409);
                assert!(message.starts_with("23505: duplicate key"), "got {message}");
                assert!(message.contains("already exists"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limit_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .table("issue_groups")
            .fetch::<Row>()
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn unreachable_store_is_transient() {
        // Bind then drop a server so the port is closed.
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };
        let err = test_client(&uri)
            .table("messages")
            .fetch::<Row>()
            .await
            .unwrap_err();
        assert!(err.is_transient(), "got {err:?}");
    }

    #[tokio::test]
    async fn undecodable_rows_are_storage_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"an array\"}"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .table("messages")
            .fetch::<Row>()
            .await
            .unwrap_err();
        assert!(matches!(err, WatchError::Storage { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn empty_body_decodes_as_no_rows() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let rows: Vec<Row> = test_client(&server.uri())
            .table("issue_groups")
            .eq("id", "g1")
            .update(&json!({"status": "closed"}))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}
