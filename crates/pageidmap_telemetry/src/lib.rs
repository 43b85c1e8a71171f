pub mod setup;

pub use setup::{TelemetryConfig, TelemetryError, Verbosity, init_telemetry};
