//! Integration tests for the REST API
//!
//! Requests go straight into the router with `oneshot`; no socket is bound.

use axum::http::StatusCode;
use serde_json::json;

use shared::RunPhase;

mod common;
use common::{EMAIL, call, controller, router};

#[tokio::test]
async fn test_health() {
    let router = router(controller());
    let (status, body) = call(&router, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_initial_state() {
    // Arrange
    let router = router(controller());

    // Act
    let (status, body) = call(&router, "GET", "/api/state", None).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let data = &body["data"];
    assert_eq!(data["phase"], "idle");
    assert_eq!(data["index"], 0);
    assert_eq!(data["progress"], json!({ "current": 1, "total": 11, "percent": 9 }));
    assert_eq!(data["current"]["title"], "Register (Fail) - Email Tak Valid");
    assert_eq!(data["current"]["method"], "POST");
    assert_eq!(data["session"]["authenticated"], false);
}

#[tokio::test]
async fn test_list_and_get_steps() {
    let router = router(controller());

    let (status, body) = call(&router, "GET", "/api/steps", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 11);

    let (status, body) = call(&router, "GET", "/api/steps/8", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["path"], "/transactions/borrow/{book_id}");

    let (status, body) = call(&router, "GET", "/api/steps/11", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_run_then_advance() {
    // Arrange
    let router = router(controller());

    // Act
    let (advance_early, _) = call(&router, "POST", "/api/advance", None).await;
    let (run_status, run) = call(&router, "POST", "/api/run", None).await;
    let (advance_status, advanced) = call(&router, "POST", "/api/advance", None).await;

    // Assert
    assert_eq!(advance_early, StatusCode::CONFLICT);
    assert_eq!(run_status, StatusCode::OK);
    assert_eq!(run["data"]["result"]["status"], "failure");
    assert_eq!(run["data"]["can_advance"], true);
    assert_eq!(run["message"], "Step 1 finished: FAIL");
    assert_eq!(advance_status, StatusCode::OK);
    assert_eq!(advanced["data"]["index"], 1);
}

#[tokio::test]
async fn test_run_with_payload_override() {
    // Arrange
    let router = router(controller());
    call(&router, "POST", "/api/jump/1", None).await;

    // Act - edited payload sent as text, the way the page's textarea holds it
    let payload = json!({ "payload": format!(r#"{{"email":"{EMAIL}","password":"Password123!","name":"QA"}}"#) });
    let (status, body) = call(&router, "POST", "/api/run", Some(payload)).await;
    let (_, state) = call(&router, "GET", "/api/state", None).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"]["status"], "success");
    assert_eq!(state["data"]["session"]["email"], EMAIL);
}

#[tokio::test]
async fn test_malformed_payload_is_recorded() {
    let router = router(controller());

    let (status, body) = call(&router, "POST", "/api/run", Some(json!({ "payload": "{\"email\": " }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"]["kind"], "malformed_payload");
}

#[tokio::test]
async fn test_retreat_and_jump_bounds() {
    let router = router(controller());

    let (status, _) = call(&router, "POST", "/api/retreat", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(&router, "POST", "/api/jump/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&router, "POST", "/api/jump/10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_last"], true);

    let (status, body) = call(&router, "POST", "/api/retreat", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["index"], 9);
}

#[tokio::test]
async fn test_auto_run_in_background() {
    // Arrange
    let controller = controller();
    let router = router(controller.clone());

    // Act
    let (status, body) = call(&router, "POST", "/api/auto-run", None).await;

    // Assert
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["message"], "Auto-run started");

    tokio::time::timeout(std::time::Duration::from_secs(5), async {
        while controller.phase().await != RunPhase::Completed {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("auto-run did not finish");

    let (_, state) = call(&router, "GET", "/api/state", None).await;
    let data = &state["data"];
    assert_eq!(data["summary"]["executed"], 11);
    assert_eq!(data["summary"]["unexpected"], json!([]));
    assert_eq!(data["session"]["authenticated"], true);
    assert_eq!(data["session"]["book_id"], "5");
    assert_eq!(data["session"]["transaction_id"], "77");
    assert_eq!(data["log"][0], "[1/11] Running: Register (Fail) - Email Tak Valid...");
}

#[tokio::test]
async fn test_second_auto_run_is_rejected() {
    // Arrange - hold the latch as a running auto-run would
    let controller = controller();
    controller.session().write().await.start_auto_run().unwrap();
    let router = router(controller);

    // Act
    let (auto_status, body) = call(&router, "POST", "/api/auto-run", None).await;
    let (run_status, _) = call(&router, "POST", "/api/run", None).await;
    let (_, state) = call(&router, "GET", "/api/state", None).await;

    // Assert
    assert_eq!(auto_status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Auto-run is in progress");
    assert_eq!(run_status, StatusCode::CONFLICT);
    assert_eq!(state["data"]["phase"], "running");
}

#[tokio::test]
async fn test_reset() {
    // Arrange
    let controller = controller();
    let router = router(controller.clone());
    controller.auto_run().await.unwrap();

    // Act
    let (status, body) = call(&router, "POST", "/api/reset", None).await;
    let (_, state) = call(&router, "GET", "/api/state", None).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["index"], 0);
    assert!(body["data"]["result"].is_null());
    assert_eq!(state["data"]["summary"]["executed"], 0);
    assert_eq!(state["data"]["session"]["authenticated"], false);
    assert_eq!(state["data"]["log"], json!([]));

    // The render produced by the reset survives the log being cleared
    let snapshot = controller.presenter().snapshot().await;
    assert_eq!(snapshot.last_view.map(|view| view.index), Some(0));
    assert_eq!(snapshot.progress.map(|progress| progress.current), Some(1));
}
