//! Runner → presentation render requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Expectation, HttpMethod, OutcomeKind, StepStatus};

/// Cached outcome of one executed step
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StepResult {
    /// Response body, server error body, or a synthetic `{"error": ...}` body
    pub body: Value,
    pub elapsed_ms: u64,
    pub status: StepStatus,
    pub kind: OutcomeKind,
    pub executed_at: DateTime<Utc>,
}

impl StepResult {
    pub fn new(body: Value, elapsed_ms: u64, kind: OutcomeKind) -> Self {
        Self {
            body,
            elapsed_ms,
            status: kind.status(),
            kind,
            executed_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Everything the presentation layer needs to draw one step card
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StepView {
    pub index: usize,
    pub id: u32,
    pub title: String,
    pub description: String,
    pub method: HttpMethod,
    pub path: String,
    /// Pretty-printed payload template, editable by the user before running
    pub payload_template: Option<String>,
    pub expectation: Expectation,
    pub result: Option<StepResult>,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub is_last: bool,
}

impl StepView {
    /// `None` until the step has been executed
    pub fn matches_expectation(&self) -> Option<bool> {
        self.result
            .as_ref()
            .map(|result| self.expectation.is_met_by(result.status))
    }

    /// Last step executed: the run button becomes "done"
    pub fn is_done(&self) -> bool {
        self.is_last && self.result.is_some()
    }
}

/// Progress bar state, `current` is 1-based
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub percent: u8,
}

impl ProgressUpdate {
    pub fn new(index: usize, total: usize) -> Self {
        if total == 0 {
            return Self { current: 0, total: 0, percent: 0 };
        }
        let current = (index + 1).min(total);
        let percent = ((current as f64 / total as f64) * 100.0).round() as u8;
        Self { current, total, percent }
    }
}

/// Coarse state of a run session
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    Running,
    Completed,
}

/// End-of-run report
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub executed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Step ids whose status contradicts their expectation
    pub unexpected: Vec<u32>,
}

impl RunSummary {
    pub fn from_views(views: &[StepView]) -> Self {
        let mut summary = RunSummary {
            total: views.len(),
            ..Default::default()
        };

        for view in views {
            let Some(result) = &view.result else { continue };
            summary.executed += 1;
            if result.is_success() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            if view.matches_expectation() == Some(false) {
                summary.unexpected.push(view.id);
            }
        }

        summary
    }

    pub fn all_as_expected(&self) -> bool {
        self.executed == self.total && self.unexpected.is_empty()
    }
}
