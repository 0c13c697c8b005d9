//! Core types used throughout the guided API tester

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::errors::SharedError;

/// Global component singleton - set once at startup
static COMPONENT: OnceLock<Component> = OnceLock::new();

/// Fallback used before a binary has called one of the `init_*` functions
static DEFAULT_COMPONENT: Component = Component::Tester;

/// Identifier of the running binary, attached to every log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    /// Command line runner
    Tester,
    /// HTTP bridge serving the documentation page
    WebServer,
}

impl Component {
    /// Initialize the global component for the CLI runner
    pub fn init_tester() -> &'static Component {
        COMPONENT.get_or_init(|| Component::Tester)
    }

    /// Initialize the global component for the HTTP bridge
    pub fn init_webserver() -> &'static Component {
        COMPONENT.get_or_init(|| Component::WebServer)
    }

    /// Get the global component (falls back to `Tester` when uninitialized)
    pub fn current() -> &'static Component {
        COMPONENT.get().unwrap_or(&DEFAULT_COMPONENT)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Tester => write!(f, "tester"),
            Component::WebServer => write!(f, "webserver"),
        }
    }
}

/// HTTP method of a scenario step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(SharedError::InvalidMethod { input: s.to_string() }),
        }
    }
}

/// Derived pass/fail classification of an executed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Success,
    Failure,
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Success)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Success => write!(f, "OK"),
            StepStatus::Failure => write!(f, "FAIL"),
        }
    }
}

/// What produced a step outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The action completed and the body did not look like an error
    Success,
    /// The server answered with an error status or an error-shaped body
    ServerFailure,
    /// The request never produced a response
    Transport,
    /// A prerequisite from an earlier step is missing; nothing was sent
    Precondition,
    /// The payload override could not be parsed as JSON; nothing was sent
    MalformedPayload,
    /// Anything else raised while running the action
    Unexpected,
}

impl OutcomeKind {
    /// Status derived from the kind
    pub fn status(&self) -> StepStatus {
        match self {
            OutcomeKind::Success => StepStatus::Success,
            _ => StepStatus::Failure,
        }
    }
}

/// Whether a step is written to succeed or to exercise a negative path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    Success,
    Failure,
}

impl Expectation {
    pub fn is_met_by(&self, status: StepStatus) -> bool {
        match self {
            Expectation::Success => status == StepStatus::Success,
            Expectation::Failure => status == StepStatus::Failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_parsing() {
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!(" GET ".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!(
            "FETCH".parse::<HttpMethod>(),
            Err(SharedError::InvalidMethod { input: "FETCH".to_string() })
        );
    }

    #[test]
    fn test_outcome_kind_status() {
        assert_eq!(OutcomeKind::Success.status(), StepStatus::Success);
        assert_eq!(OutcomeKind::ServerFailure.status(), StepStatus::Failure);
        assert_eq!(OutcomeKind::Precondition.status(), StepStatus::Failure);
        assert_eq!(OutcomeKind::MalformedPayload.status(), StepStatus::Failure);
    }

    #[test]
    fn test_expectation() {
        assert!(Expectation::Failure.is_met_by(StepStatus::Failure));
        assert!(!Expectation::Failure.is_met_by(StepStatus::Success));
        assert!(Expectation::Success.is_met_by(StepStatus::Success));
    }

    #[test]
    fn test_component_display() {
        assert_eq!(Component::Tester.to_string(), "tester");
        assert_eq!(Component::WebServer.to_string(), "webserver");
    }
}
