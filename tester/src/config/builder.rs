//! Runner Configuration Builder
//!
//! Provides a flexible builder pattern for constructing runner configurations

use super::RunnerConfig;
use std::path::PathBuf;
use std::time::Duration;

pub struct RunnerConfigBuilder {
    config: RunnerConfig,
}

impl RunnerConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RunnerConfig::default(),
        }
    }

    /// Start from an existing configuration (e.g. one loaded from the environment)
    pub fn from_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Set base URL of the service under test
    pub fn base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the file holding the persisted token and email
    pub fn storage_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.storage_path = path.into();
        self
    }

    /// Pause after each executed step during auto-run
    pub fn step_pacing(mut self, pacing: Duration) -> Self {
        self.config.step_pacing = pacing;
        self
    }

    /// Pause after each advance during auto-run
    pub fn advance_pacing(mut self, pacing: Duration) -> Self {
        self.config.advance_pacing = pacing;
        self
    }

    /// Disable both pacing delays
    pub fn without_pacing(self) -> Self {
        self.step_pacing(Duration::ZERO).advance_pacing(Duration::ZERO)
    }

    /// Set per-request timeout of the HTTP client
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set log level (trace, debug, info, warn, error)
    pub fn log_level<S: Into<String>>(mut self, level: S) -> Self {
        self.config.log_level = level.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> RunnerConfig {
        self.config
    }
}

impl Default for RunnerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
