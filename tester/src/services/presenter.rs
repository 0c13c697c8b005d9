//! Presentation layers
//!
//! [`TerminalPresenter`] prints step cards for the CLI.
//! [`SnapshotPresenter`] keeps the latest render state in memory so an HTTP
//! front end can poll it.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

use shared::{Expectation, ProgressUpdate, StepView, logging::format_timestamp};
use crate::traits::Presenter;

/// Auto-run lines kept by [`SnapshotPresenter`]
pub const MAX_LOG_LINES: usize = 200;

/// Render a step card as plain text
pub fn format_step_card(view: &StepView) -> String {
    let mut card = format!(
        "── Step {} ── {}\n{}\n{} {}\n",
        view.id, view.title, view.description, view.method, view.path
    );

    let expected = match view.expectation {
        Expectation::Success => "expects success",
        Expectation::Failure => "expects failure",
    };
    card.push_str(&format!("({expected})\n"));

    if let Some(template) = &view.payload_template {
        card.push_str("Payload:\n");
        card.push_str(template);
        card.push('\n');
    }

    match &view.result {
        Some(result) => {
            let verdict = match view.matches_expectation() {
                Some(true) => "as expected",
                _ => "UNEXPECTED",
            };
            card.push_str(&format!(
                "Result: {} in {}ms ({verdict})\n",
                result.status, result.elapsed_ms
            ));
            let body = serde_json::to_string_pretty(&result.body).unwrap_or_else(|_| result.body.to_string());
            card.push_str(&body);
            card.push('\n');
        }
        None => card.push_str("Not run yet\n"),
    }

    card
}

/// Render a progress line, e.g. `[#####-----] 5/11 (45%)`
pub fn format_progress(update: ProgressUpdate) -> String {
    const WIDTH: usize = 20;
    let filled = (update.percent as usize * WIDTH) / 100;
    format!(
        "[{}{}] {}/{} ({}%)",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        update.current,
        update.total,
        update.percent
    )
}

/// Stdout presenter used by the CLI
#[derive(Debug, Clone, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Presenter for TerminalPresenter {
    async fn render_step(&self, view: &StepView) {
        println!("{}", format_step_card(view));
    }

    async fn progress(&self, update: ProgressUpdate) {
        println!("{}", format_progress(update));
    }

    async fn auto_run_log(&self, message: &str) {
        println!("[{}] {}", format_timestamp(), message);
    }
}

/// Latest render state
#[derive(Debug, Clone, Default, Serialize)]
pub struct PresenterSnapshot {
    pub last_view: Option<StepView>,
    pub progress: Option<ProgressUpdate>,
    pub log: VecDeque<String>,
}

/// In-memory presenter, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct SnapshotPresenter {
    state: Arc<RwLock<PresenterSnapshot>>,
}

impl SnapshotPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> PresenterSnapshot {
        self.state.read().await.clone()
    }

    /// Drop the auto-run log, keeping the last render
    pub async fn clear_log(&self) {
        self.state.write().await.log.clear();
    }
}

#[async_trait]
impl Presenter for SnapshotPresenter {
    async fn render_step(&self, view: &StepView) {
        self.state.write().await.last_view = Some(view.clone());
    }

    async fn progress(&self, update: ProgressUpdate) {
        self.state.write().await.progress = Some(update);
    }

    async fn auto_run_log(&self, message: &str) {
        let mut state = self.state.write().await;
        if state.log.len() == MAX_LOG_LINES {
            state.log.pop_front();
        }
        state.log.push_back(message.to_string());
    }
}
