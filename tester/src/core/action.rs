//! Step actions: one HTTP call plus the context reads and writes around it

use serde_json::Value;

use crate::core::context::SessionContext;
use crate::traits::HttpClient;
use crate::types::{
    ApiRequest, Capture, EmailHook, FailureMode, HttpOutcome, RESOURCE_PLACEHOLDER, Step, StepFailure,
};

/// Normal completion of an action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutput {
    pub body: Value,
    /// HTTP status when a response was received
    pub status: u16,
    /// The server reported a failure and the step returned its body anyway
    pub tolerated_failure: bool,
}

/// Run a step's action against the session context
///
/// Order matters and mirrors what the steps rely on:
/// precondition check, payload hooks (a remembered email is stored before
/// the request is sent), the request itself, then captures on success.
pub async fn perform<H>(
    step: &Step,
    payload: Option<Value>,
    ctx: &mut SessionContext,
    http: &H,
) -> Result<ActionOutput, StepFailure>
where
    H: HttpClient + ?Sized,
{
    let action = step.action;

    if action.requires_resource && ctx.resource_id().is_none() {
        return Err(StepFailure::Precondition {
            message: "No book id captured yet. Run step 'List Koleksi Buku' first.".to_string(),
        });
    }

    let body = apply_email_hook(action.email, payload, ctx)?;
    let path = render_path(&step.path, ctx);
    let bearer = if action.bearer {
        ctx.token().map(str::to_string)
    } else {
        None
    };

    let request = ApiRequest {
        method: step.method,
        path,
        bearer,
        body,
    };

    match http.send(request).await {
        Ok(HttpOutcome::Success { status, body }) => {
            capture(action.capture, &body, ctx);
            Ok(ActionOutput {
                body,
                status,
                tolerated_failure: false,
            })
        }
        Ok(HttpOutcome::Failure { status, body }) => match action.on_failure {
            FailureMode::ReturnBody => Ok(ActionOutput {
                body,
                status,
                tolerated_failure: true,
            }),
            FailureMode::Propagate => Err(StepFailure::Server { status, body }),
        },
        Err(error) => Err(StepFailure::Transport(error)),
    }
}

fn apply_email_hook(
    hook: EmailHook,
    payload: Option<Value>,
    ctx: &mut SessionContext,
) -> Result<Option<Value>, StepFailure> {
    match hook {
        EmailHook::None => Ok(payload),
        EmailHook::Remember => {
            if let Some(email) = payload.as_ref().and_then(|p| p.get("email")).and_then(Value::as_str) {
                ctx.set_email(email);
            }
            Ok(payload)
        }
        EmailHook::Inject => {
            let mut payload = payload.unwrap_or_else(|| Value::Object(Default::default()));
            let Value::Object(fields) = &mut payload else {
                return Err(StepFailure::Unexpected {
                    message: "Payload must be a JSON object to carry the registered email".to_string(),
                });
            };
            let email = ctx.email().unwrap_or_default().to_string();
            fields.insert("email".to_string(), Value::String(email));
            Ok(Some(payload))
        }
    }
}

fn render_path(template: &str, ctx: &SessionContext) -> String {
    match ctx.resource_id() {
        Some(id) => template.replace(RESOURCE_PLACEHOLDER, id),
        None => template.to_string(),
    }
}

fn capture(capture: Capture, body: &Value, ctx: &mut SessionContext) {
    match capture {
        Capture::None => {}
        Capture::Token => {
            if let Some(token) = body.pointer("/data/token").and_then(Value::as_str).filter(|t| !t.is_empty()) {
                ctx.set_token(token);
            }
        }
        Capture::FirstResourceId => {
            if let Some(id) = body.pointer("/data/0/id").and_then(id_text) {
                ctx.set_resource_id(id);
            }
        }
        Capture::TransactionId => {
            if let Some(id) = body.pointer("/data/id").and_then(id_text) {
                ctx.set_transaction_id(id);
            }
        }
    }
}

/// Ids arrive as numbers from the service, but strings are accepted too
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}
