//! WebServer-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use shared::SharedError;
use tester::TesterError;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("HTTP server startup failed: {0}")]
    ServerStartup(String),

    #[error("Invalid request format: {details}")]
    InvalidRequest { details: String },

    #[error("Response building error: {0}")]
    ResponseError(String),

    #[error(transparent)]
    Tester(#[from] TesterError),

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WebServerError {
    pub fn invalid_request(details: impl Into<String>) -> Self {
        WebServerError::InvalidRequest { details: details.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebServerError::InvalidRequest { .. } | WebServerError::SharedError(_) => StatusCode::BAD_REQUEST,
            WebServerError::Tester(TesterError::StepOutOfRange { .. }) => StatusCode::NOT_FOUND,
            WebServerError::Tester(error) if error.is_rejected_command() => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = json!({
            "status": "error",
            "message": self.to_string(),
            "data": null
        });
        (status, Json(body)).into_response()
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (WebServerError::from(TesterError::StepNotRun { number: 1 }), StatusCode::CONFLICT),
            (WebServerError::from(TesterError::AtFirstStep), StatusCode::CONFLICT),
            (WebServerError::from(TesterError::AutoRunInProgress), StatusCode::CONFLICT),
            (WebServerError::from(TesterError::StepOutOfRange { index: 20, len: 11 }), StatusCode::NOT_FOUND),
            (WebServerError::from(TesterError::storage("disk full")), StatusCode::INTERNAL_SERVER_ERROR),
            (WebServerError::invalid_request("payload must be a string"), StatusCode::BAD_REQUEST),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{error}");
        }
    }
}
