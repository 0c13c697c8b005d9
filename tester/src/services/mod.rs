//! Tester services implementations

pub mod http_client;
pub mod kv_store;
pub mod presenter;

#[cfg(test)]
pub mod tests;

pub use http_client::*;
pub use kv_store::*;
pub use presenter::*;
