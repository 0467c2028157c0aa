use crate::env::{env_or, LOG_INSTALL_SUBSCRIBER_ENV, LOG_LEVEL_ENV, LOG_OUTPUT_ENV};
use crate::level::{Level, ParseLevelError};
use crate::shared::{set_default_core, LogCore};
use crate::tracing_writer::TracingWriter;
use crate::writer::{JsonWriter, LogWriter};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Where the default logger writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    /// JSON lines on stdout.
    #[default]
    Stdout,
    /// JSON lines on stderr.
    Stderr,
    /// Events of the `tracing` crate.
    Tracing,
}

impl FromStr for Output {
    type Err = InitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Output::Stdout),
            "stderr" => Ok(Output::Stderr),
            "tracing" => Ok(Output::Tracing),
            _ => Err(InitError::InvalidOutput(s.to_string())),
        }
    }
}

/// Конфигурация логгера по умолчанию.
///
/// **Поля**
/// - `level`: минимальный уровень, ниже которого записи не пишутся.
/// - `output`: куда пишутся записи, см. [`Output`].
/// - `install_subscriber`: если `true` и `output = Tracing`, в процессе
///   устанавливается глобальный `tracing_subscriber` с `fmt`‑слоем.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: Level,
    pub output: Output,
    pub install_subscriber: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            output: Output::Stdout,
            install_subscriber: false,
        }
    }
}

impl LoggerConfig {
    /// Build a config from `LOG_LEVEL`, `LOG_OUTPUT` and
    /// `LOG_INSTALL_SUBSCRIBER`, using defaults for unset variables.
    pub fn from_env() -> Result<Self, InitError> {
        Ok(Self {
            level: env_or(LOG_LEVEL_ENV, "debug").parse()?,
            output: env_or(LOG_OUTPUT_ENV, "stdout").parse()?,
            install_subscriber: matches!(
                env_or(LOG_INSTALL_SUBSCRIBER_ENV, "false").trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            ),
        })
    }

    /// Core described by this config, without installing it anywhere.
    pub fn build_core(&self) -> LogCore {
        let writer: Arc<dyn LogWriter> = match self.output {
            Output::Stdout => Arc::new(JsonWriter::stdout()),
            Output::Stderr => Arc::new(JsonWriter::stderr()),
            Output::Tracing => Arc::new(TracingWriter::new()),
        };
        LogCore::new(writer).with_level(self.level)
    }
}

/// Error returned while configuring or installing the default logger.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    InvalidLevel(#[from] ParseLevelError),

    #[error("not a valid log output: {0:?}")]
    InvalidOutput(String),

    #[error("default logger is already initialized")]
    AlreadyInitialized,

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the process-wide default logger described by `config`.
///
/// **Effects**
///
/// Every handle returned by [`entry`](crate::entry) afterwards uses this
/// core. Fails with [`InitError::AlreadyInitialized`] if a default core was
/// installed or used before.
pub fn init_logger_with_config(config: LoggerConfig) -> Result<Arc<LogCore>, InitError> {
    let core = Arc::new(config.build_core());
    set_default_core(Arc::clone(&core)).map_err(|_| InitError::AlreadyInitialized)?;

    // Подписчик ставим только по запросу: приложение может уже иметь свой.
    if config.output == Output::Tracing && config.install_subscriber {
        let subscriber = Registry::default().with(tracing_subscriber::fmt::layer());
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(core)
}

/// Initialize the default logger from the environment.
///
/// Equivalent to [`init_logger_with_config`] with
/// [`LoggerConfig::from_env`].
pub fn init_logger() -> Result<Arc<LogCore>, InitError> {
    init_logger_with_config(LoggerConfig::from_env()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_stdout_debug() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.output, Output::Stdout);
        assert!(!config.install_subscriber);
        assert_eq!(config.build_core().level(), Level::Debug);
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: LoggerConfig = serde_json::from_str(r#"{"level":"warn","output":"tracing"}"#).unwrap();
        assert_eq!(config.level, Level::Warn);
        assert_eq!(config.output, Output::Tracing);
        assert!(!config.install_subscriber);
    }

    #[test]
    fn rejects_unknown_output() {
        assert!(matches!("syslog".parse::<Output>(), Err(InitError::InvalidOutput(_))));
    }
}
