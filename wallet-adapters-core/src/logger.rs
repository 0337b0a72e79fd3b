//! Bridge from the `log` facade to a host-provided logger.
//!
//! Adapters log fallback selections and degraded operations through `log`.
//! Hosts (the React Native bridge, a Node addon, a test harness) receive those
//! records by installing a [`Logger`] with [`set_logger`].

use std::sync::{Arc, OnceLock};

/// Trait representing a logger that can log messages at various levels.
///
/// It is exported via `UniFFI` so foreign hosts can implement it.
///
/// ```rust
/// use wallet_adapters_core::logger::{LogLevel, Logger};
///
/// struct ConsoleLogger;
///
/// impl Logger for ConsoleLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         println!("[{level:?}] {message}");
///     }
/// }
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Logs a message at the specified log level.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a forwarded log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Designates very low priority, often extremely detailed messages.
    Trace,
    /// Designates lower priority debugging information.
    Debug,
    /// Designates informational messages.
    Info,
    /// Designates potentially harmful situations, such as an insecure fallback.
    Warn,
    /// Designates error events that might still allow the application to continue running.
    Error,
}

/// Forwards `log` records to the host-provided [`Logger`].
struct ForeignLogger;

impl log::Log for ForeignLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let is_record_from_adapters = record
            .module_path()
            .is_some_and(|module_path| module_path.starts_with("wallet_adapters"));

        let is_debug_or_trace_level =
            record.level() == log::Level::Debug || record.level() == log::Level::Trace;

        // Dependencies (reqwest, hyper, rustls) are chatty at debug/trace.
        if is_debug_or_trace_level && !is_record_from_adapters {
            return;
        }

        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(log_level(record.level()), format!("{}", record.args()));
        } else {
            eprintln!("Logger not set: {}", record.args());
        }
    }

    fn flush(&self) {}
}

const fn log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Sets the global logger.
///
/// Only the first call takes effect; later calls print a notice and are ignored.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        println!("Logger already set");
        return;
    }

    if let Err(e) = init_logger() {
        eprintln!("Failed to set logger: {e}");
    }
}

fn init_logger() -> Result<(), log::SetLoggerError> {
    static LOGGER: ForeignLogger = ForeignLogger;
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::LogCapture;

    #[test]
    fn test_level_mapping() {
        assert_eq!(log_level(log::Level::Warn), LogLevel::Warn);
        assert_eq!(log_level(log::Level::Trace), LogLevel::Trace);
        assert_eq!(log_level(log::Level::Error), LogLevel::Error);
    }

    #[test]
    fn test_records_reach_installed_logger() {
        let logs = LogCapture::start();
        log::warn!("memory storage in use");
        log::debug!("probe finished");
        assert_eq!(logs.warnings(), 1);
        assert_eq!(logs.messages(), vec!["memory storage in use", "probe finished"]);
    }

    #[test]
    fn test_foreign_debug_records_are_dropped() {
        let logs = LogCapture::start();
        log::Log::log(
            &ForeignLogger,
            &log::Record::builder()
                .level(log::Level::Debug)
                .module_path(Some("hyper::proto"))
                .args(format_args!("chatty dependency"))
                .build(),
        );
        assert!(logs.messages().is_empty());
    }
}
