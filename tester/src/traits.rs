//! Collaborator trait definitions for dependency injection
//!
//! The runner core only talks to the outside world through these traits:
//! the service under test, a small key-value store for resuming a session,
//! and whatever presentation layer displays the run.

use async_trait::async_trait;

use shared::{ProgressUpdate, StepView};
use crate::error::TesterResult;
use crate::types::{ApiRequest, HttpOutcome, TransportError};

/// Key under which the bearer token is persisted
pub const TOKEN_KEY: &str = "tester_token";

/// Key under which the registered email is persisted
pub const EMAIL_KEY: &str = "tester_email";

/// HTTP client for the service under test
#[mockall::automock]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send one request to the configured base URL
    ///
    /// Error-shaped responses come back as `Ok(HttpOutcome::Failure)`;
    /// `Err` is reserved for requests that never got a response.
    async fn send(&self, request: ApiRequest) -> Result<HttpOutcome, TransportError>;
}

/// Persistence used to resume a session across restarts
#[mockall::automock]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> TesterResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> TesterResult<()>;

    async fn remove(&self, key: &str) -> TesterResult<()>;
}

/// Presentation layer receiving render requests
#[mockall::automock]
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Draw a step card, including its cached result if any
    async fn render_step(&self, view: &StepView);

    /// Update the progress indicator
    async fn progress(&self, update: ProgressUpdate);

    /// One-line status while auto-run is active
    async fn auto_run_log(&self, message: &str);
}
