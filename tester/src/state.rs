//! Run session state
//!
//! A [`RunSession`] owns everything a run mutates: current index, result
//! cache, session context and the latches guarding single-flight execution.
//! Executing a step is split in two so the HTTP call never runs under the
//! session lock: [`RunSession::begin_step`] snapshots what the executor
//! needs, [`RunSession::commit`] writes the outcome back in one go.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use shared::{ProgressUpdate, RunPhase, RunSummary, StepResult, StepView};
use crate::core::{ResultCache, Scenario, SessionContext};
use crate::error::{TesterError, TesterResult};
use crate::types::Step;

/// Shared session handle
pub type SharedRunSession = Arc<RwLock<RunSession>>;

/// Create new shared session
pub fn create_shared_session(session: RunSession) -> SharedRunSession {
    Arc::new(RwLock::new(session))
}

/// Snapshot handed to the executor
#[derive(Debug, Clone)]
pub struct PendingStep {
    pub run_id: Uuid,
    pub index: usize,
    pub step: Step,
    pub context: SessionContext,
    pub payload: Option<String>,
}

/// Outcome to write back into the session
#[derive(Debug, Clone)]
pub struct CompletedStep {
    pub run_id: Uuid,
    pub index: usize,
    /// Context after the action; `None` keeps the session's context untouched
    pub context: Option<SessionContext>,
    pub result: StepResult,
}

#[derive(Debug)]
pub struct RunSession {
    scenario: Arc<Scenario>,
    index: usize,
    cache: ResultCache,
    context: SessionContext,
    /// Regenerated on reset; completions carrying an older id are dropped
    run_id: Uuid,
    auto_running: bool,
    in_flight: bool,
}

impl RunSession {
    pub fn new(scenario: Arc<Scenario>) -> Self {
        Self {
            scenario,
            index: 0,
            cache: ResultCache::new(),
            context: SessionContext::new(),
            run_id: Uuid::new_v4(),
            auto_running: false,
            in_flight: false,
        }
    }

    pub fn with_context(scenario: Arc<Scenario>, context: SessionContext) -> Self {
        Self {
            context,
            ..Self::new(scenario)
        }
    }

    pub fn scenario(&self) -> &Arc<Scenario> {
        &self.scenario
    }

    pub fn len(&self) -> usize {
        self.scenario.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenario.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_last(&self) -> bool {
        self.index == self.scenario.last_index()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.context
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn is_auto_running(&self) -> bool {
        self.auto_running
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn phase(&self) -> RunPhase {
        if self.auto_running {
            RunPhase::Running
        } else if self.cache.len() == self.scenario.len() {
            RunPhase::Completed
        } else {
            RunPhase::Idle
        }
    }

    /// Snapshot the current step for execution and mark it in flight
    pub fn begin_step(&mut self, payload: Option<String>) -> TesterResult<PendingStep> {
        if self.in_flight {
            return Err(TesterError::StepInFlight);
        }

        let step = self
            .scenario
            .get(self.index)
            .cloned()
            .ok_or(TesterError::StepOutOfRange { index: self.index, len: self.scenario.len() })?;

        self.in_flight = true;
        Ok(PendingStep {
            run_id: self.run_id,
            index: self.index,
            step,
            context: self.context.clone(),
            payload,
        })
    }

    /// Write a completed step back; `false` when it belongs to a run that
    /// was reset in the meantime and has been discarded
    pub fn commit(&mut self, completed: CompletedStep) -> bool {
        if completed.run_id != self.run_id {
            return false;
        }

        self.in_flight = false;
        if let Some(context) = completed.context {
            self.context = context;
        }
        self.cache.put(completed.index, completed.result);
        true
    }

    pub fn advance(&mut self) -> TesterResult<usize> {
        if self.is_last() {
            return Err(TesterError::AtLastStep { number: self.index + 1 });
        }
        if !self.cache.contains(self.index) {
            return Err(TesterError::StepNotRun { number: self.index + 1 });
        }
        self.index += 1;
        Ok(self.index)
    }

    pub fn retreat(&mut self) -> TesterResult<usize> {
        if self.index == 0 {
            return Err(TesterError::AtFirstStep);
        }
        self.index -= 1;
        Ok(self.index)
    }

    pub fn jump(&mut self, index: usize) -> TesterResult<usize> {
        if index >= self.scenario.len() {
            return Err(TesterError::StepOutOfRange { index, len: self.scenario.len() });
        }
        self.index = index;
        Ok(self.index)
    }

    /// Set the auto-run latch and return the run id the loop is bound to
    pub fn start_auto_run(&mut self) -> TesterResult<Uuid> {
        if self.auto_running {
            return Err(TesterError::AutoRunInProgress);
        }
        if self.in_flight {
            return Err(TesterError::StepInFlight);
        }
        self.auto_running = true;
        Ok(self.run_id)
    }

    /// Clear the auto-run latch if it still belongs to `run_id`
    pub fn finish_auto_run(&mut self, run_id: Uuid) {
        if self.run_id == run_id {
            self.auto_running = false;
        }
    }

    /// Back to step 1 with an empty cache and context, under a new run id
    ///
    /// A generated registration address is replaced so the next run can
    /// register again.
    pub fn reset(&mut self) {
        self.scenario = Arc::new(self.scenario.for_new_session());
        self.index = 0;
        self.cache.clear();
        self.context.clear();
        self.run_id = Uuid::new_v4();
        self.auto_running = false;
        self.in_flight = false;
    }

    pub fn view(&self, index: usize) -> TesterResult<StepView> {
        let step = self
            .scenario
            .get(index)
            .ok_or(TesterError::StepOutOfRange { index, len: self.scenario.len() })?;
        let is_current = index == self.index;
        let is_last = index == self.scenario.last_index();
        let result = self.cache.get(index).cloned();

        Ok(StepView {
            index,
            id: step.id,
            title: step.title.clone(),
            description: step.description.clone(),
            method: step.method,
            path: step.path.clone(),
            payload_template: step.payload_text(),
            expectation: step.expectation,
            can_advance: is_current && !is_last && result.is_some(),
            can_retreat: is_current && index > 0,
            is_last,
            result,
        })
    }

    pub fn current_view(&self) -> StepView {
        // index is kept within bounds by every mutator
        self.view(self.index)
            .unwrap_or_else(|_| unreachable!("current index {} out of range", self.index))
    }

    pub fn views(&self) -> Vec<StepView> {
        (0..self.scenario.len()).filter_map(|index| self.view(index).ok()).collect()
    }

    pub fn progress(&self) -> ProgressUpdate {
        ProgressUpdate::new(self.index, self.scenario.len())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_views(&self.views())
    }
}
