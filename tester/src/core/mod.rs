//! Runner core logic

pub mod cache;
pub mod classify;
pub mod context;
pub mod action;
pub mod executor;
pub mod scenario;

pub use cache::ResultCache;
pub use classify::{classify_response, is_failure_body};
pub use context::SessionContext;
pub use action::perform;
pub use executor::StepExecutor;
pub use scenario::Scenario;
