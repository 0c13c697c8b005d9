//! REST API handlers
//!
//! One endpoint per runner command plus read-only views. Every response uses
//! the `{"status", "message", "data"}` envelope.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use shared::{Component, RunnerCommand, component_info, logging};
use tester::{HttpClient, KeyValueStore};

use crate::error::{WebServerError, WebServerResult};
use crate::state::AppState;

/// Body of `POST /api/run`
///
/// `payload` is the edited template: the raw text, or a JSON value that is
/// re-serialized before running.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RunRequest {
    pub payload: Option<Value>,
}

impl RunRequest {
    fn payload_text(self) -> Option<String> {
        match self.payload? {
            Value::Null => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        }
    }
}

fn success(message: impl Into<String>, data: Value) -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": message.into(),
        "data": data
    }))
}

fn to_data<T: Serialize>(value: &T) -> WebServerResult<Value> {
    serde_json::to_value(value).map_err(|e| WebServerError::ResponseError(e.to_string()))
}

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Current step, progress, summary and session flags - GET /api/state
pub async fn get_state<H, S>(State(state): State<AppState<H, S>>) -> WebServerResult<Json<Value>>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    let controller = &state.controller;
    let current = controller.current_view().await;
    let context = controller.context().await;
    let snapshot = controller.presenter().snapshot().await;

    let data = json!({
        "phase": to_data(&controller.phase().await)?,
        "index": current.index,
        "progress": to_data(&controller.progress().await)?,
        "current": to_data(&current)?,
        "summary": to_data(&controller.summary().await)?,
        "session": {
            "authenticated": context.token().is_some(),
            "email": context.email(),
            "book_id": context.resource_id(),
            "transaction_id": context.transaction_id()
        },
        "log": to_data(&snapshot.log)?,
        "uptime_seconds": state.uptime_seconds()
    });

    Ok(success("Run state", data))
}

/// All step cards - GET /api/steps
pub async fn list_steps<H, S>(State(state): State<AppState<H, S>>) -> WebServerResult<Json<Value>>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    let views = state.controller.views().await;
    Ok(success(format!("{} steps", views.len()), to_data(&views)?))
}

/// One step card by 0-based index - GET /api/steps/:index
pub async fn get_step<H, S>(
    State(state): State<AppState<H, S>>,
    Path(index): Path<usize>,
) -> WebServerResult<Json<Value>>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    let view = state.controller.view(index).await?;
    Ok(success(view.title.clone(), to_data(&view)?))
}

/// Execute the current step - POST /api/run
pub async fn run_step<H, S>(
    State(state): State<AppState<H, S>>,
    body: Option<Json<RunRequest>>,
) -> WebServerResult<Json<Value>>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    let payload = body.map(|Json(request)| request).unwrap_or_default().payload_text();
    let view = state.controller.dispatch(RunnerCommand::Run { payload }).await?;

    let message = match &view.result {
        Some(result) => format!("Step {} finished: {}", view.id, result.status),
        None => format!("Step {} result discarded", view.id),
    };
    Ok(success(message, to_data(&view)?))
}

/// POST /api/advance
pub async fn advance<H, S>(State(state): State<AppState<H, S>>) -> WebServerResult<Json<Value>>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    let view = state.controller.dispatch(RunnerCommand::Advance).await?;
    Ok(success(format!("Moved to step {}", view.id), to_data(&view)?))
}

/// POST /api/retreat
pub async fn retreat<H, S>(State(state): State<AppState<H, S>>) -> WebServerResult<Json<Value>>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    let view = state.controller.dispatch(RunnerCommand::Retreat).await?;
    Ok(success(format!("Moved to step {}", view.id), to_data(&view)?))
}

/// POST /api/jump/:index
pub async fn jump<H, S>(
    State(state): State<AppState<H, S>>,
    Path(index): Path<usize>,
) -> WebServerResult<Json<Value>>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    let view = state.controller.dispatch(RunnerCommand::Jump { index }).await?;
    Ok(success(format!("Moved to step {}", view.id), to_data(&view)?))
}

/// Start auto-run in the background - POST /api/auto-run
pub async fn auto_run<H, S>(State(state): State<AppState<H, S>>) -> WebServerResult<(StatusCode, Json<Value>)>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    let handle = state.controller.spawn_auto_run().await?;

    tokio::spawn(async move {
        let component = Component::current();
        match handle.await {
            Ok(Ok(summary)) => {
                component_info!(component, executed = summary.executed, failed = summary.failed, "🏁 Background auto-run finished");
            }
            Ok(Err(e)) => logging::log_error(component, "Auto-run", &e),
            Err(e) => logging::log_error(component, "Auto-run task", &e),
        }
    });

    let progress = state.controller.progress().await;
    Ok((StatusCode::ACCEPTED, success("Auto-run started", to_data(&progress)?)))
}

/// POST /api/reset
pub async fn reset<H, S>(State(state): State<AppState<H, S>>) -> WebServerResult<Json<Value>>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    let view = state.controller.dispatch(RunnerCommand::Reset).await?;
    state.controller.presenter().clear_log().await;
    Ok(success("Session reset", to_data(&view)?))
}
