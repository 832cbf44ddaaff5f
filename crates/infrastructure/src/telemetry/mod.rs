//! Logging and tracing setup
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either
//! human-readable or JSON output.

mod subscriber;

pub use subscriber::{TelemetryConfig, TelemetryError, init_telemetry};
