//! Run controller: manual stepping, navigation and paced auto-run
//!
//! Generic over its collaborators so tests drive it with mocks. Cloning is
//! cheap; clones share the same session.

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tokio::task::JoinHandle;
use uuid::Uuid;

use shared::{
    Component, OutcomeKind, ProgressUpdate, RunPhase, RunSummary, RunnerCommand, StepResult, StepView,
    component_debug, component_error, component_info, component_warn,
};
use crate::config::{Pacing, RunnerConfig};
use crate::core::{Scenario, SessionContext, StepExecutor};
use crate::services::{FileKeyValueStore, RealHttpClient};
use crate::error::{TesterError, TesterResult};
use crate::state::{CompletedStep, PendingStep, RunSession, SharedRunSession, create_shared_session};
use crate::traits::{EMAIL_KEY, HttpClient, KeyValueStore, Presenter, TOKEN_KEY};

pub struct RunController<H, S, P>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
    P: Presenter + 'static,
{
    session: SharedRunSession,
    executor: Arc<StepExecutor<H>>,
    store: Arc<S>,
    presenter: Arc<P>,
    pacing: Pacing,
}

impl<H, S, P> Clone for RunController<H, S, P>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
    P: Presenter + 'static,
{
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            executor: Arc::clone(&self.executor),
            store: Arc::clone(&self.store),
            presenter: Arc::clone(&self.presenter),
            pacing: self.pacing,
        }
    }
}

impl<H, S, P> RunController<H, S, P>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
    P: Presenter + 'static,
{
    pub fn new(scenario: Scenario, http: H, store: S, presenter: P, pacing: Pacing) -> Self {
        Self {
            session: create_shared_session(RunSession::new(Arc::new(scenario))),
            executor: Arc::new(StepExecutor::new(http)),
            store: Arc::new(store),
            presenter: Arc::new(presenter),
            pacing,
        }
    }

    pub fn session(&self) -> &SharedRunSession {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Load the persisted token and email into the session context
    pub async fn restore(&self) -> TesterResult<StepView> {
        let token = self.store.get(TOKEN_KEY).await?;
        let email = self.store.get(EMAIL_KEY).await?;

        let view = {
            let mut session = self.session.write().await;
            let context = session.context_mut();
            if let Some(token) = token.filter(|t| !t.is_empty()) {
                context.set_token(token);
            }
            if let Some(email) = email.filter(|e| !e.is_empty()) {
                component_info!(Component::current(), "🔑 Restored session for {}", email);
                context.set_email(email);
            }
            session.current_view()
        };

        self.render(&view).await;
        Ok(view)
    }

    /// Execute the current step with an optional payload override
    ///
    /// Never advances; the returned view says whether advancing is allowed.
    pub async fn run_current(&self, payload: Option<String>) -> TesterResult<StepView> {
        let pending = {
            let mut session = self.session.write().await;
            if session.is_auto_running() {
                return Err(TesterError::AutoRunInProgress);
            }
            session.begin_step(payload)?
        };

        let view = self.execute_pending(pending).await?;
        self.render(&view).await;
        Ok(view)
    }

    /// Run a snapshot to completion and commit it
    ///
    /// The step runs in its own task so a panic is recorded as an unexpected
    /// failure. Committing and persisting happen in an outer task that is
    /// not cancelled if the caller goes away, so the in-flight latch is
    /// always released.
    async fn execute_pending(&self, pending: PendingStep) -> TesterResult<StepView> {
        let executor = Arc::clone(&self.executor);
        let session = Arc::clone(&self.session);
        let store = Arc::clone(&self.store);
        let index = pending.index;

        let committed = tokio::spawn(async move {
            let PendingStep { run_id, index, step, context, payload } = pending;
            let before = context.clone();
            let started = Instant::now();

            let task = tokio::spawn(async move {
                let mut context = context;
                let result = executor.execute(&step, payload.as_deref(), &mut context).await;
                (context, result)
            });

            let completed = match task.await {
                Ok((context, result)) => CompletedStep { run_id, index, context: Some(context), result },
                Err(e) => {
                    component_error!(Component::current(), step = index + 1, "💥 Step task failed: {}", e);
                    CompletedStep {
                        run_id,
                        index,
                        context: None,
                        result: StepResult::new(
                            json!({ "error": format!("Step task failed: {e}") }),
                            started.elapsed().as_millis() as u64,
                            OutcomeKind::Unexpected,
                        ),
                    }
                }
            };

            let after = completed.context.clone();
            let committed = session.write().await.commit(completed);
            if committed {
                if let Some(after) = after {
                    persist(store.as_ref(), &before, &after).await;
                }
            }
            committed
        })
        .await?;

        let session = self.session.read().await;
        if committed {
            session.view(index)
        } else {
            component_warn!(Component::current(), "🗑️ Discarded result of step {} from a reset run", index + 1);
            Ok(session.current_view())
        }
    }

    pub async fn advance(&self) -> TesterResult<StepView> {
        let view = {
            let mut session = self.session.write().await;
            if session.is_auto_running() {
                return Err(TesterError::AutoRunInProgress);
            }
            session.advance()?;
            session.current_view()
        };
        self.render(&view).await;
        Ok(view)
    }

    pub async fn retreat(&self) -> TesterResult<StepView> {
        let view = {
            let mut session = self.session.write().await;
            if session.is_auto_running() {
                return Err(TesterError::AutoRunInProgress);
            }
            session.retreat()?;
            session.current_view()
        };
        self.render(&view).await;
        Ok(view)
    }

    /// Show any step; a cached result is displayed, nothing is re-run
    pub async fn jump(&self, index: usize) -> TesterResult<StepView> {
        let view = {
            let mut session = self.session.write().await;
            session.jump(index)?;
            session.current_view()
        };
        self.render(&view).await;
        Ok(view)
    }

    /// Execute from the current step to the last one with pacing
    ///
    /// Step failures never stop the loop. A reset while running ends it.
    pub async fn auto_run(&self) -> TesterResult<RunSummary> {
        let run_id = self.session.write().await.start_auto_run()?;
        self.drive_auto_run(run_id).await
    }

    /// Start auto-run in a background task
    ///
    /// The latch is taken before returning, so a rejected start is reported
    /// to the caller rather than to the task.
    pub async fn spawn_auto_run(&self) -> TesterResult<JoinHandle<TesterResult<RunSummary>>> {
        let run_id = self.session.write().await.start_auto_run()?;
        let controller = self.clone();
        Ok(tokio::spawn(async move { controller.drive_auto_run(run_id).await }))
    }

    async fn drive_auto_run(&self, run_id: Uuid) -> TesterResult<RunSummary> {
        component_info!(Component::current(), "🚀 Auto-run started");

        let outcome = self.auto_run_loop(run_id).await;
        self.session.write().await.finish_auto_run(run_id);

        outcome?;
        let summary = self.summary().await;
        component_info!(
            Component::current(),
            executed = summary.executed,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "🏁 Auto-run finished"
        );
        self.presenter
            .auto_run_log(&format!(
                "Done: {}/{} executed, {} ok, {} failed",
                summary.executed, summary.total, summary.succeeded, summary.failed
            ))
            .await;
        Ok(summary)
    }

    async fn auto_run_loop(&self, run_id: Uuid) -> TesterResult<()> {
        loop {
            let (pending, total) = {
                let mut session = self.session.write().await;
                if session.run_id() != run_id {
                    break;
                }
                (session.begin_step(None)?, session.len())
            };

            self.presenter
                .auto_run_log(&format!("[{}/{}] Running: {}...", pending.index + 1, total, pending.step.title))
                .await;

            let view = self.execute_pending(pending).await?;
            self.render(&view).await;
            tokio::time::sleep(self.pacing.after_step).await;

            {
                let mut session = self.session.write().await;
                if session.run_id() != run_id {
                    break;
                }
                // Jumped to a step without a result while pacing: run it next
                if !session.cache().contains(session.index()) {
                    continue;
                }
                if session.is_last() {
                    break;
                }
                session.advance()?;
            }

            self.presenter.progress(self.progress().await).await;
            tokio::time::sleep(self.pacing.after_advance).await;
        }
        Ok(())
    }

    /// Forget persisted credentials and start over at step 1
    pub async fn reset(&self) -> TesterResult<StepView> {
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(EMAIL_KEY).await?;

        let view = {
            let mut session = self.session.write().await;
            session.reset();
            session.current_view()
        };

        component_info!(Component::current(), "🔄 Session reset");
        self.render(&view).await;
        Ok(view)
    }

    pub async fn current_view(&self) -> StepView {
        self.session.read().await.current_view()
    }

    pub async fn view(&self, index: usize) -> TesterResult<StepView> {
        self.session.read().await.view(index)
    }

    pub async fn views(&self) -> Vec<StepView> {
        self.session.read().await.views()
    }

    pub async fn progress(&self) -> ProgressUpdate {
        self.session.read().await.progress()
    }

    pub async fn phase(&self) -> RunPhase {
        self.session.read().await.phase()
    }

    pub async fn summary(&self) -> RunSummary {
        self.session.read().await.summary()
    }

    pub async fn context(&self) -> SessionContext {
        self.session.read().await.context().clone()
    }

    /// Apply a presentation command and return the view to display
    pub async fn dispatch(&self, command: RunnerCommand) -> TesterResult<StepView> {
        component_debug!(Component::current(), "Command: {:?}", command);
        match command {
            RunnerCommand::Run { payload } => self.run_current(payload).await,
            RunnerCommand::Advance => self.advance().await,
            RunnerCommand::Retreat => self.retreat().await,
            RunnerCommand::Jump { index } => self.jump(index).await,
            RunnerCommand::AutoRun => {
                self.auto_run().await?;
                Ok(self.current_view().await)
            }
            RunnerCommand::Reset => self.reset().await,
        }
    }

    async fn render(&self, view: &StepView) {
        self.presenter.render_step(view).await;
        self.presenter.progress(self.progress().await).await;
    }
}

/// Controller wired to the service under test and the session file
pub type LiveController<P> = RunController<RealHttpClient, FileKeyValueStore, P>;

impl<P> LiveController<P>
where
    P: Presenter + 'static,
{
    pub fn from_config(config: &RunnerConfig, scenario: Scenario, presenter: P) -> TesterResult<Self> {
        config.validate()?;
        let http = RealHttpClient::new(&config.base_url, config.request_timeout)?;
        let store = FileKeyValueStore::new(config.storage_path.clone());
        Ok(Self::new(scenario, http, store, presenter, config.pacing()))
    }
}

/// Write changed token and email through to the store
async fn persist<S: KeyValueStore + ?Sized>(store: &S, before: &SessionContext, after: &SessionContext) {
    let changes = [
        (TOKEN_KEY, before.token(), after.token()),
        (EMAIL_KEY, before.email(), after.email()),
    ];

    for (key, old, new) in changes {
        let Some(value) = new.filter(|value| Some(*value) != old) else {
            continue;
        };
        if let Err(e) = store.set(key, value).await {
            component_warn!(Component::current(), "⚠️ Failed to persist {}: {}", key, e);
        }
    }
}
