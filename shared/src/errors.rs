//! Shared error types for the guided API tester

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Unsupported HTTP method: {input}")]
    InvalidMethod { input: String },

    #[error("Unknown runner command: {input}")]
    InvalidCommand { input: String },

    #[error("Invalid step number '{input}' (steps are numbered from 1)")]
    InvalidStepNumber { input: String },
}
