use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to initialize telemetry: {0}")]
    Init(String),
}

/// How chatty diagnostics on stderr should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Nothing at all, `RUST_LOG` included.
    Silent,
    /// Warnings and errors.
    #[default]
    Normal,
    /// Progress messages as well.
    Verbose,
}

impl Verbosity {
    pub fn from_flags(silent: bool, verbose: bool) -> Self {
        match (silent, verbose) {
            (true, _) => Self::Silent,
            (false, true) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }

    pub fn level(self) -> LevelFilter {
        match self {
            Self::Silent => LevelFilter::OFF,
            Self::Normal => LevelFilter::WARN,
            Self::Verbose => LevelFilter::INFO,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub verbosity: Verbosity,
    pub json_output: bool,
}

/// Installs the global subscriber. Diagnostics always go to stderr; stdout
/// is reserved for rendered output.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = match config.verbosity {
        Verbosity::Silent => EnvFilter::new("off"),
        verbosity => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(verbosity.level().to_string())),
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json_output {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer.without_time()).try_init()
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))
}
