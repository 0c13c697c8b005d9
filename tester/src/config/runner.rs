//! Runner Configuration
//!
//! Settings shared by the CLI and the HTTP bridge. Values come from defaults,
//! then the environment (`.env` is honoured), then command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use super::RunnerConfigBuilder;
use crate::core::scenario::DEFAULT_BASE_URL;
use crate::error::{TesterError, TesterResult};

pub const ENV_BASE_URL: &str = "TESTER_BASE_URL";
pub const ENV_STORAGE_PATH: &str = "TESTER_STORAGE_PATH";
pub const ENV_LOG_LEVEL: &str = "TESTER_LOG_LEVEL";
pub const ENV_STEP_PACING_MS: &str = "TESTER_STEP_PACING_MS";
pub const ENV_ADVANCE_PACING_MS: &str = "TESTER_ADVANCE_PACING_MS";
pub const ENV_TIMEOUT_SECS: &str = "TESTER_TIMEOUT_SECS";

/// Auto-run delays that give a human observer time to read each outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub after_step: Duration,
    pub after_advance: Duration,
}

impl Pacing {
    pub const fn none() -> Self {
        Self {
            after_step: Duration::ZERO,
            after_advance: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_step: Duration::from_millis(1500),
            after_advance: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub base_url: String,
    pub storage_path: PathBuf,
    pub step_pacing: Duration,
    pub advance_pacing: Duration,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let pacing = Pacing::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            storage_path: PathBuf::from(".tester/session.json"),
            step_pacing: pacing.after_step,
            advance_pacing: pacing.after_advance,
            request_timeout: Duration::from_secs(30),
            log_level: "info".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Create a new builder
    pub fn builder() -> RunnerConfigBuilder {
        RunnerConfigBuilder::new()
    }

    /// Defaults overridden by `TESTER_*` variables (loads `.env` first)
    pub fn from_env() -> TesterResult<Self> {
        dotenv::dotenv().ok();
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> TesterResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(path) = lookup(ENV_STORAGE_PATH) {
            self.storage_path = PathBuf::from(path);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(ms) = lookup(ENV_STEP_PACING_MS) {
            self.step_pacing = Duration::from_millis(parse_number(ENV_STEP_PACING_MS, &ms)?);
        }
        if let Some(ms) = lookup(ENV_ADVANCE_PACING_MS) {
            self.advance_pacing = Duration::from_millis(parse_number(ENV_ADVANCE_PACING_MS, &ms)?);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout = Duration::from_secs(parse_number(ENV_TIMEOUT_SECS, &secs)?);
        }
        Ok(())
    }

    /// Reject base URLs that are not absolute http(s) URLs
    pub fn validate(&self) -> TesterResult<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| TesterError::config(format!("Invalid base URL '{}': {}", self.base_url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(TesterError::config(format!(
                "Base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(TesterError::config("Request timeout must be greater than zero"));
        }

        Ok(())
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            after_step: self.step_pacing,
            after_advance: self.advance_pacing,
        }
    }
}

fn parse_number(key: &str, value: &str) -> TesterResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| TesterError::config(format!("{key} must be a whole number, got '{value}'")))
}
