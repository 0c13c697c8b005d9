//! Message types exchanged with the presentation layer
//!
//! - `view`: render requests produced by the runner (step view, progress, summary)
//! - `command`: user-originated commands consumed by the runner

pub mod view;
pub mod command;

pub use view::{StepResult, StepView, ProgressUpdate, RunPhase, RunSummary};
pub use command::RunnerCommand;
