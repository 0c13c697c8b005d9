//! Tests for tester services
//!
//! The HTTP client runs against a local mock server, the file store against
//! a temporary directory.
