//! Step executor: run one action, time it, classify the outcome

use std::time::Instant;

use serde_json::{Value, json};

use shared::{Component, OutcomeKind, StepResult, component_debug, component_error, component_info, component_warn};
use crate::core::action::perform;
use crate::core::classify::is_failure_body;
use crate::core::context::SessionContext;
use crate::traits::HttpClient;
use crate::types::{Step, StepFailure};

/// Executes steps against one HTTP client
///
/// Never fails: every outcome, including a malformed payload override,
/// becomes a [`StepResult`]. Storing the result is the caller's job.
pub struct StepExecutor<H>
where
    H: HttpClient,
{
    http: H,
}

impl<H> StepExecutor<H>
where
    H: HttpClient,
{
    pub fn new(http: H) -> Self {
        Self { http }
    }

    /// Execute `step` with an optional user-edited payload text
    ///
    /// Without an override the step's own payload template is sent.
    pub async fn execute(&self, step: &Step, raw_payload: Option<&str>, ctx: &mut SessionContext) -> StepResult {
        let started = Instant::now();
        let component = Component::current();

        let payload = match parse_payload(step, raw_payload) {
            Ok(payload) => payload,
            Err(message) => {
                component_warn!(component, step = step.id, "📝 Payload rejected for '{}': {}", step.title, message);
                return StepResult::new(json!({ "error": message }), elapsed_ms(started), OutcomeKind::MalformedPayload);
            }
        };

        component_debug!(component, step = step.id, "▶️ {} {}", step.endpoint(), step.title);

        let result = match perform(step, payload, ctx, &self.http).await {
            Ok(output) => {
                let kind = if output.tolerated_failure || is_failure_body(&output.body) {
                    OutcomeKind::ServerFailure
                } else {
                    OutcomeKind::Success
                };
                StepResult::new(output.body, elapsed_ms(started), kind)
            }
            Err(failure) => {
                log_failure(step, &failure);
                let kind = failure.kind();
                StepResult::new(failure.into_body(), elapsed_ms(started), kind)
            }
        };

        component_info!(
            component,
            step = step.id,
            elapsed_ms = result.elapsed_ms,
            "{} [{}] {} ({:?})",
            if result.is_success() { "✅" } else { "❌" },
            result.status,
            step.title,
            result.kind
        );

        result
    }
}

fn parse_payload(step: &Step, raw_payload: Option<&str>) -> Result<Option<Value>, String> {
    if step.payload.is_none() {
        return Ok(None);
    }

    match raw_payload {
        Some(text) => serde_json::from_str(text)
            .map(Some)
            .map_err(|e| format!("Payload is not valid JSON: {e}")),
        None => Ok(step.payload.clone()),
    }
}

fn log_failure(step: &Step, failure: &StepFailure) {
    let component = Component::current();
    match failure {
        StepFailure::Precondition { message } => {
            component_warn!(component, step = step.id, "⛔ Precondition for '{}': {}", step.title, message);
        }
        StepFailure::Server { status, .. } => {
            component_debug!(component, step = step.id, "Server rejected '{}' with HTTP {}", step.title, status);
        }
        StepFailure::Transport(error) => {
            component_warn!(component, step = step.id, "🔌 Transport failure for '{}': {}", step.title, error);
        }
        StepFailure::Unexpected { message } => {
            component_error!(component, step = step.id, "💥 Unexpected failure in '{}': {}", step.title, message);
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scenario::Scenario;
    use crate::traits::MockHttpClient;
    use crate::types::{HttpOutcome, TransportError};
    use shared::StepStatus;

    fn step(title: &str) -> Step {
        let scenario = Scenario::library_flow_with_email("tester_5@xan.id");
        let index = scenario.position(title).unwrap();
        scenario.get(index).unwrap().clone()
    }

    #[tokio::test]
    async fn test_register_fail_is_classified_failure() {
        let step = step("Register (Fail) - Email Tak Valid");
        let mut http = MockHttpClient::new();
        http.expect_send()
            .withf(|request| request.body == Some(json!({"email": "email-salah", "password": "123", "name": "User"})))
            .times(1)
            .returning(|_| {
                Ok(HttpOutcome::Failure {
                    status: 400,
                    body: json!({"status": "error", "message": "invalid email format", "data": null}),
                })
            });
        let executor = StepExecutor::new(http);
        let mut ctx = SessionContext::new();

        let raw = r#"{"email":"email-salah","password":"123","name":"User"}"#;
        let result = executor.execute(&step, Some(raw), &mut ctx).await;

        assert_eq!(result.status, StepStatus::Failure);
        assert_eq!(result.kind, OutcomeKind::ServerFailure);
        assert_eq!(result.body["message"], "invalid email format");
        assert_eq!(ctx, SessionContext::new());
    }

    #[tokio::test]
    async fn test_tolerated_failure_without_error_shape_is_still_failure() {
        let step = step("Login (Fail) - Password Salah");
        let mut http = MockHttpClient::new();
        http.expect_send()
            .returning(|_| Ok(HttpOutcome::Failure { status: 502, body: json!("Bad Gateway") }));
        let executor = StepExecutor::new(http);

        let result = executor.execute(&step, None, &mut SessionContext::new()).await;
        assert_eq!(result.kind, OutcomeKind::ServerFailure);
    }

    #[tokio::test]
    async fn test_success_body_with_error_code_is_failure() {
        let step = step("Riwayat Pinjaman");
        let mut http = MockHttpClient::new();
        http.expect_send()
            .returning(|_| Ok(HttpOutcome::Success { status: 200, body: json!({"code": 404}) }));
        let executor = StepExecutor::new(http);

        let result = executor.execute(&step, None, &mut SessionContext::new()).await;
        assert_eq!(result.status, StepStatus::Failure);
    }

    #[tokio::test]
    async fn test_success() {
        let step = step("List Koleksi Buku");
        let mut http = MockHttpClient::new();
        http.expect_send().returning(|_| {
            Ok(HttpOutcome::Success { status: 200, body: json!({"status": "success", "data": [{"id": 3}]}) })
        });
        let executor = StepExecutor::new(http);
        let mut ctx = SessionContext::new();

        let result = executor.execute(&step, None, &mut ctx).await;
        assert_eq!(result.kind, OutcomeKind::Success);
        assert!(result.is_success());
        assert_eq!(ctx.resource_id(), Some("3"));
    }

    #[tokio::test]
    async fn test_malformed_payload_never_reaches_network() {
        let step = step("OTP (Success)");
        let mut http = MockHttpClient::new();
        http.expect_send().times(0);
        let executor = StepExecutor::new(http);

        let result = executor.execute(&step, Some("{\"otp\": "), &mut SessionContext::new()).await;
        assert_eq!(result.kind, OutcomeKind::MalformedPayload);
        assert_eq!(result.status, StepStatus::Failure);
        assert!(result.body["error"].as_str().unwrap().starts_with("Payload is not valid JSON"));
    }

    #[tokio::test]
    async fn test_override_ignored_for_steps_without_payload() {
        let step = step("Cek Profil Saya");
        let mut http = MockHttpClient::new();
        http.expect_send()
            .withf(|request| request.body.is_none())
            .returning(|_| Ok(HttpOutcome::Success { status: 200, body: json!({"status": "success"}) }));
        let executor = StepExecutor::new(http);

        let result = executor.execute(&step, Some("not json at all"), &mut SessionContext::new()).await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_transport_and_precondition_failures() {
        let mut http = MockHttpClient::new();
        http.expect_send()
            .returning(|_| Err(TransportError::Timeout { message: "30s elapsed".to_string() }));
        let executor = StepExecutor::new(http);

        let transport = executor
            .execute(&step("Cek Profil Saya"), None, &mut SessionContext::new())
            .await;
        assert_eq!(transport.kind, OutcomeKind::Transport);
        assert_eq!(transport.body, json!({"error": "request timed out: 30s elapsed"}));

        let precondition = executor
            .execute(&step("Kembalikan Buku"), None, &mut SessionContext::new())
            .await;
        assert_eq!(precondition.kind, OutcomeKind::Precondition);
    }
}
