/// Environment variable names used by this crate for convenient
/// configuration of the default logger from services.
///
/// These are purely helpers; [`LoggerConfig`](crate::init::LoggerConfig)
/// itself remains decoupled from environment access.

/// Minimum severity, e.g. `info`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Output of the default logger: `stdout`, `stderr` or `tracing`.
pub const LOG_OUTPUT_ENV: &str = "LOG_OUTPUT";

/// `true` to install a `tracing_subscriber` fmt layer when the output is
/// `tracing`.
pub const LOG_INSTALL_SUBSCRIBER_ENV: &str = "LOG_INSTALL_SUBSCRIBER";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
