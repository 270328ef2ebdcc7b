//! Diagnostic side-channel for the tape engine
//!
//! Nothing in the repository or the player fails loudly. Construction
//! failures, contract violations and stale handles are reported here and
//! the offending operation becomes a no-op.
//!
//! - `Logger` trait for custom sinks (file, network, test spies)
//! - `CallbackLogger` wraps a plain `(severity, message)` closure
//! - `DefaultLogger` prints colored lines to stdout
//! - `LogChannel` is the injected handle; without a logger it drops everything

use colored::*;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// # Example
///
/// ```no_run
/// use tape_engine::tape::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Emitting component (e.g. "tape::ResourceManager")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    /// Very verbose playback tracing
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Recoverable misuse (stale handle, finalized mesh, ...)
    Warn,

    /// Construction failures, with file:line details
    Error,
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO",
            LogSeverity::Warn => "WARN",
            LogSeverity::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            );
        } else {
            println!(
                "[{}] [{}] [{}] {}",
                timestamp, severity_str, source, entry.message
            );
        }
    }
}

/// Logger forwarding `(severity, message)` to a closure
///
/// The message handed to the closure is prefixed with the source, e.g.
/// `"[tape::Mesh] mesh already finalized"`.
pub struct CallbackLogger {
    callback: Box<dyn Fn(LogSeverity, &str) + Send + Sync>,
}

impl CallbackLogger {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(LogSeverity, &str) + Send + Sync + 'static,
    {
        Self { callback: Box::new(callback) }
    }
}

impl Logger for CallbackLogger {
    fn log(&self, entry: &LogEntry) {
        let line = format!("[{}] {}", entry.source, entry.message);
        (self.callback)(entry.severity, &line);
    }
}

/// Injected logging handle shared by the repository and the player
///
/// Cloning is cheap. A channel built with [`LogChannel::silent`] (or
/// `Default`) discards every entry.
#[derive(Clone, Default)]
pub struct LogChannel {
    logger: Option<Arc<dyn Logger>>,
}

impl LogChannel {
    /// Channel forwarding to `logger`
    pub fn new<L: Logger + 'static>(logger: L) -> Self {
        Self { logger: Some(Arc::new(logger)) }
    }

    /// Channel forwarding to an already shared logger
    pub fn from_shared(logger: Arc<dyn Logger>) -> Self {
        Self { logger: Some(logger) }
    }

    /// Channel that drops all diagnostics
    pub fn silent() -> Self {
        Self { logger: None }
    }

    /// Channel printing to the console through `DefaultLogger`
    pub fn console() -> Self {
        Self::new(DefaultLogger)
    }

    /// Whether a logger is attached
    pub fn is_enabled(&self) -> bool {
        self.logger.is_some()
    }

    /// Emit an entry without file:line information
    ///
    /// Used by `engine_trace!` .. `engine_warn!`.
    pub fn log(&self, severity: LogSeverity, source: &str, message: String) {
        if let Some(logger) = &self.logger {
            logger.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Emit an entry carrying file:line information
    ///
    /// Used by `engine_error!` and `engine_bail!`.
    pub fn log_detailed(
        &self,
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Some(logger) = &self.logger {
            logger.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

impl fmt::Debug for LogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogChannel")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
///
/// ```ignore
/// engine_trace!(self.log, "tape::PipelinePlayer", "executing {:?}", opcode);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($channel:expr, $source:expr, $($arg:tt)*) => {
        $channel.log(
            $crate::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! engine_debug {
    ($channel:expr, $source:expr, $($arg:tt)*) => {
        $channel.log(
            $crate::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! engine_info {
    ($channel:expr, $source:expr, $($arg:tt)*) => {
        $channel.log(
            $crate::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
///
/// ```ignore
/// engine_warn!(self.log, "tape::Mesh", "cannot add positions: mesh is finalized");
/// ```
#[macro_export]
macro_rules! engine_warn {
    ($channel:expr, $source:expr, $($arg:tt)*) => {
        $channel.log(
            $crate::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! engine_error {
    ($channel:expr, $source:expr, $($arg:tt)*) => {
        $channel.log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR and return `Err($variant(message))` from the enclosing function
///
/// ```ignore
/// engine_bail!(log, "tape::PipelinePlayer", InvalidConfig, "context width is zero");
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($channel:expr, $source:expr, $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $channel.log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        return Err($crate::error::Error::$variant(message));
    }};
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
