//! Webserver state management

use std::time::Instant;

use tester::{HttpClient, KeyValueStore, RunController, SnapshotPresenter};

/// Controller the HTTP bridge drives; renders go to an in-memory snapshot
pub type BridgeController<H, S> = RunController<H, S, SnapshotPresenter>;

/// State shared by every handler
pub struct AppState<H, S>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    pub controller: BridgeController<H, S>,
    pub started_at: Instant,
}

impl<H, S> AppState<H, S>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    pub fn new(controller: BridgeController<H, S>) -> Self {
        Self {
            controller,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl<H, S> Clone for AppState<H, S>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            started_at: self.started_at,
        }
    }
}
