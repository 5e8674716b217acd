//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use moderately_client::{
    ClientBuilder, HttpRequest, HttpResponse, ModeratelyClient, Result, RetryPolicy, Transport,
};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_KEY: &str = "sk-test";
pub const TEAM_ID: &str = "team-42";

/// Retry policy with the default shape but millisecond delays.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new()
        .with_base_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(5))
}

/// Builder pointed at a mock server.
pub fn builder_for(server: &MockServer) -> ClientBuilder {
    ModeratelyClient::builder()
        .api_key(API_KEY)
        .team_id(TEAM_ID)
        .base_url(server.uri())
        .retry_policy(fast_retry())
}

/// Client pointed at a mock server.
pub fn client_for(server: &MockServer) -> ModeratelyClient {
    builder_for(server).build().unwrap()
}

/// A one-page list response.
pub fn page_json(items: Value) -> Value {
    let count = items.as_array().map_or(0, Vec::len);
    json!({
        "items": items,
        "pagination": {"page": 1, "pageSize": 20, "totalItems": count, "totalPages": 1}
    })
}

/// Transport that replays canned outcomes and records every request.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new(responses: impl IntoIterator<Item = HttpResponse>) -> Self {
        Self::with_results(responses.into_iter().map(Ok))
    }

    /// Script transport-level failures alongside responses.
    pub fn with_results(results: impl IntoIterator<Item = Result<HttpResponse>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(results.into_iter().collect())),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted")
    }
}

/// Client over a scripted transport.
pub fn scripted_client(transport: &ScriptedTransport, retry: RetryPolicy) -> ModeratelyClient {
    ModeratelyClient::builder()
        .api_key(API_KEY)
        .team_id(TEAM_ID)
        .base_url("https://api.test")
        .retry_policy(retry)
        .transport(transport.clone())
        .build()
        .unwrap()
}
