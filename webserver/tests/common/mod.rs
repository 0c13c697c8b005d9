//! Common test utilities for the API tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use shared::HttpMethod;
use tester::types::{ApiRequest, HttpOutcome, TransportError};
use tester::{HttpClient, MemoryKeyValueStore, Pacing, RunController, Scenario, SnapshotPresenter};
use webserver::{BridgeController, WebServer};

pub const EMAIL: &str = "tester_8080@xan.id";
pub const TOKEN: &str = "jwt-bridge";

/// Minimal stand-in for the library service
pub struct FakeService;

#[async_trait]
impl HttpClient for FakeService {
    async fn send(&self, request: ApiRequest) -> Result<HttpOutcome, TransportError> {
        let body = request.body.unwrap_or(Value::Null);
        let ok = |data: Value| HttpOutcome::Success {
            status: 200,
            body: json!({ "status": "success", "data": data }),
        };
        let fail = |status: u16, message: &str| HttpOutcome::Failure {
            status,
            body: json!({ "status": "error", "message": message }),
        };

        let outcome = match (request.method, request.path.as_str()) {
            (HttpMethod::Post, "/auth/register") if body["email"] == "email-salah" => fail(400, "invalid email format"),
            (HttpMethod::Post, "/auth/otp") if body["otp"] != "123456" => fail(400, "invalid otp"),
            (HttpMethod::Post, "/auth/login") if body["password"] != "Password123!" => fail(401, "Invalid email or password"),
            (HttpMethod::Post, "/auth/login") => ok(json!({ "token": TOKEN })),
            (HttpMethod::Get, "/books") => ok(json!([{ "id": 5 }])),
            (HttpMethod::Post, "/transactions/borrow/5") => ok(json!({ "id": 77 })),
            _ => ok(Value::Null),
        };
        Ok(outcome)
    }
}

pub type TestController = BridgeController<FakeService, MemoryKeyValueStore>;

pub fn controller() -> TestController {
    RunController::new(
        Scenario::library_flow_with_email(EMAIL),
        FakeService,
        MemoryKeyValueStore::new(),
        SnapshotPresenter::new(),
        Pacing::none(),
    )
}

pub fn router(controller: TestController) -> Router {
    WebServer::new(controller).build_router()
}

/// Send one request and decode the JSON envelope
pub async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
