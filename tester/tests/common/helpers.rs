//! Test helpers and builder patterns for controller tests
//!
//! [`RecordingHttp`] answers with a closure and keeps every request so
//! tests can assert on execution order.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use tester::traits::KeyValueStore;
use tester::types::{ApiRequest, HttpOutcome, TransportError};
use tester::{HttpClient, MemoryKeyValueStore, Pacing, RunController, Scenario, SnapshotPresenter};
use super::fixtures::TestFixtures;

type Responder = dyn Fn(&ApiRequest) -> Result<HttpOutcome, TransportError> + Send + Sync;

pub type TestController = RunController<RecordingHttp, MemoryKeyValueStore, SnapshotPresenter>;

#[derive(Clone)]
pub struct RecordingHttp {
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    responder: Arc<Responder>,
    latency: Duration,
}

impl RecordingHttp {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<HttpOutcome, TransportError> + Send + Sync + 'static,
    {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            responder: Arc::new(responder),
            latency: Duration::ZERO,
        }
    }

    /// Wait this long before answering each request
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Behaves like the real service
    pub fn fake_service() -> Self {
        Self::new(|request| Ok(TestFixtures::respond(request)))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `"METHOD /path"` for every request sent so far
    pub fn endpoints(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| format!("{} {}", request.method, request.path))
            .collect()
    }
}

#[async_trait]
impl HttpClient for RecordingHttp {
    async fn send(&self, request: ApiRequest) -> Result<HttpOutcome, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        (self.responder)(&request)
    }
}

/// Builder for controllers wired to in-memory collaborators
pub struct ControllerBuilder {
    http: RecordingHttp,
    pacing: Pacing,
    stored: Vec<(&'static str, String)>,
}

impl ControllerBuilder {
    /// Fake service, no pacing, empty store
    pub fn new() -> Self {
        Self {
            http: RecordingHttp::fake_service(),
            pacing: Pacing::none(),
            stored: Vec::new(),
        }
    }

    pub fn with_http(mut self, http: RecordingHttp) -> Self {
        self.http = http;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Pre-populate the key-value store
    pub fn with_stored(mut self, key: &'static str, value: &str) -> Self {
        self.stored.push((key, value.to_string()));
        self
    }

    /// Build the controller; returns the HTTP handle for inspection
    pub async fn build(self) -> (TestController, RecordingHttp) {
        let store = MemoryKeyValueStore::new();
        for (key, value) in &self.stored {
            store.set(key, value).await.unwrap();
        }

        let controller = RunController::new(
            Scenario::library_flow_with_email(TestFixtures::EMAIL),
            self.http.clone(),
            store,
            SnapshotPresenter::new(),
            self.pacing,
        );
        (controller, self.http)
    }
}
