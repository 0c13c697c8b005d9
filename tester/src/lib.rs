//! Guided API tester
//!
//! Runs a fixed sequence of HTTP scenarios against the library service,
//! one step at a time or unattended, carrying the auth token, registered
//! email and captured ids from one step to the next.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tester::*;
//!
//! # async fn demo() -> TesterResult<()> {
//! let config = RunnerConfig::builder()
//!     .base_url("https://pushtaka.xapi.my.id")
//!     .storage_path(".tester/session.json")
//!     .build();
//!
//! let controller = LiveController::from_config(&config, Scenario::library_flow(), TerminalPresenter::new())?;
//! controller.restore().await?;
//! let summary = controller.auto_run().await?;
//! assert_eq!(summary.executed, summary.total);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;

// Main interfaces - re-exported at crate root for convenience
pub use config::{Pacing, RunnerConfig, RunnerConfigBuilder};
pub use controller::{LiveController, RunController};
pub use crate::core::{Scenario, SessionContext, StepExecutor};
pub use error::{TesterError, TesterResult};

// Collaborators
pub use services::{FileKeyValueStore, MemoryKeyValueStore, RealHttpClient, SnapshotPresenter, TerminalPresenter};
pub use traits::{HttpClient, KeyValueStore, Presenter};
pub use types::{ApiRequest, HttpOutcome, Step, TransportError};
