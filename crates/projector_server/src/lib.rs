//! REST API server for stochastic price projection
//!
//! This crate exposes the projection engine over HTTP: one endpoint runs a
//! simulation, the others describe the service and report its health.
//! Requests are validated here; the engine only ever sees valid parameters.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

// Re-export projection dependencies for integration
pub use projector_core;
pub use projector_engine;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
