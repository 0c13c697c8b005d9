//! HTTP bridge for the guided API tester
//!
//! Exposes the run controller's commands and views as a small JSON API so
//! the documentation page can drive a run.

pub mod error;
pub mod state;
pub mod web;
pub mod webserver_impl;

// Re-export main types
pub use error::{WebServerError, WebServerResult};
pub use state::{AppState, BridgeController};
pub use webserver_impl::WebServer;
