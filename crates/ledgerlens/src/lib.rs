//! LedgerLens service library
//!
//! Exposed as a library so the integration tests can build the router
//! with an injected mock provider instead of spawning the binary.

pub mod server;
pub mod telemetry;
