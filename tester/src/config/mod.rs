//! Configuration Management
//!
//! This module provides the runner configuration and its builder.

pub mod builder;
pub mod runner;

// Re-export main types
pub use runner::{Pacing, RunnerConfig};
pub use builder::RunnerConfigBuilder;
