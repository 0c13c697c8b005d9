//! Runner data types: step definitions and the HTTP collaborator contract

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use shared::{Expectation, HttpMethod, OutcomeKind};

/// Path placeholder replaced by the resource id captured from a listing
pub const RESOURCE_PLACEHOLDER: &str = "{book_id}";

/// One request sent to the service under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the base URL, placeholders already rendered
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

/// Response of the service, already sorted into success or failure
#[derive(Debug, Clone, PartialEq)]
pub enum HttpOutcome {
    Success { status: u16, body: Value },
    Failure { status: u16, body: Value },
}

impl HttpOutcome {
    pub fn status(&self) -> u16 {
        match self {
            HttpOutcome::Success { status, .. } | HttpOutcome::Failure { status, .. } => *status,
        }
    }

    pub fn body(&self) -> &Value {
        match self {
            HttpOutcome::Success { body, .. } | HttpOutcome::Failure { body, .. } => body,
        }
    }
}

/// The request never produced a response
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("connection failed: {message}")]
    Connect { message: String },

    #[error("request timed out: {message}")]
    Timeout { message: String },

    #[error("request failed: {message}")]
    Request { message: String },
}

/// Why a step action did not complete normally
#[derive(Debug, Clone, PartialEq)]
pub enum StepFailure {
    /// A value from an earlier step is missing; nothing was sent
    Precondition { message: String },
    /// Server answered with an error and the step does not tolerate it
    Server { status: u16, body: Value },
    Transport(TransportError),
    Unexpected { message: String },
}

impl StepFailure {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            StepFailure::Precondition { .. } => OutcomeKind::Precondition,
            StepFailure::Server { .. } => OutcomeKind::ServerFailure,
            StepFailure::Transport(_) => OutcomeKind::Transport,
            StepFailure::Unexpected { .. } => OutcomeKind::Unexpected,
        }
    }

    /// Server-supplied body when there is one, otherwise `{"error": message}`
    pub fn into_body(self) -> Value {
        match self {
            StepFailure::Server { body, .. } => body,
            StepFailure::Precondition { message } | StepFailure::Unexpected { message } => {
                serde_json::json!({ "error": message })
            }
            StepFailure::Transport(error) => serde_json::json!({ "error": error.to_string() }),
        }
    }
}

/// Context hook applied to the payload before sending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailHook {
    #[default]
    None,
    /// Store the payload's `email` as the registered address
    Remember,
    /// Overwrite the payload's `email` with the registered address
    Inject,
}

/// Value pulled out of a successful response into the session context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capture {
    #[default]
    None,
    /// `data.token`
    Token,
    /// `data[0].id`
    FirstResourceId,
    /// `data.id`
    TransactionId,
}

/// What a server failure turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Failure outcome carrying the server body
    #[default]
    Propagate,
    /// The error body becomes the action's normal return value; the executor
    /// still classifies it as a failure from its shape
    ReturnBody,
}

/// Behaviour of a step around its single HTTP call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepAction {
    pub email: EmailHook,
    pub bearer: bool,
    pub requires_resource: bool,
    pub capture: Capture,
    pub on_failure: FailureMode,
}

impl StepAction {
    /// Plain request, no context interaction
    pub const fn send() -> Self {
        Self {
            email: EmailHook::None,
            bearer: false,
            requires_resource: false,
            capture: Capture::None,
            on_failure: FailureMode::Propagate,
        }
    }

    pub const fn remembering_email(mut self) -> Self {
        self.email = EmailHook::Remember;
        self
    }

    pub const fn with_session_email(mut self) -> Self {
        self.email = EmailHook::Inject;
        self
    }

    pub const fn authenticated(mut self) -> Self {
        self.bearer = true;
        self
    }

    pub const fn requiring_resource(mut self) -> Self {
        self.requires_resource = true;
        self
    }

    pub const fn capturing(mut self, capture: Capture) -> Self {
        self.capture = capture;
        self
    }

    pub const fn tolerating_failure(mut self) -> Self {
        self.on_failure = FailureMode::ReturnBody;
        self
    }
}

/// One titled unit of a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// 1-based sequence number shown to the user
    pub id: u32,
    pub title: String,
    pub description: String,
    pub method: HttpMethod,
    /// Path template, may contain [`RESOURCE_PLACEHOLDER`]
    pub path: String,
    pub payload: Option<Value>,
    pub expectation: Expectation,
    pub action: StepAction,
}

impl Step {
    /// e.g. `POST /auth/register`
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Pretty-printed payload template as offered for editing
    pub fn payload_text(&self) -> Option<String> {
        self.payload
            .as_ref()
            .map(|payload| serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string()))
    }
}
