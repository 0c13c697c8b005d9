//! Shared types for the guided API tester
//!
//! Contains only the types that cross the boundary between the runner core
//! and a presentation layer (terminal, HTTP bridge). Runner-internal types
//! are kept in the `tester` crate.

pub mod types;
pub mod errors;
pub mod logging;
pub mod messages;

pub use types::*;
pub use errors::*;

pub use messages::{
    // Presentation render requests
    StepResult, StepView, ProgressUpdate, RunPhase, RunSummary,

    // Presentation commands
    RunnerCommand,
};
