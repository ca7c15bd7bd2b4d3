use tracing::Level;

/// How log events are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// Human readable lines, colored when writing to a terminal.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging setup of a process.
#[derive(Debug, Clone)]
pub struct Config {
    /// `EnvFilter` directives, e.g. `warn,deployer=debug`.
    /// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
    pub(crate) env_filter: String,
    /// Events at this level or more severe go to stderr, all others to
    /// stdout.
    pub(crate) stderr_threshold: Level,
    pub(crate) format: Format,
}

impl Config {
    pub fn new(env_filter: impl Into<String>) -> Self {
        Self {
            env_filter: env_filter.into(),
            ..Default::default()
        }
    }

    pub fn with_format(self, format: Format) -> Self {
        Self { format, ..self }
    }

    /// Keeps the current threshold if `None`.
    pub fn with_stderr_threshold(self, threshold: Option<Level>) -> Self {
        Self {
            stderr_threshold: threshold.unwrap_or(self.stderr_threshold),
            ..self
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env_filter: "info".to_string(),
            stderr_threshold: Level::ERROR,
            format: Format::Text,
        }
    }
}
