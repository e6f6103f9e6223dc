//! Leveled logging facade.
//!
//! Driver code logs through the [`klog!`](crate::klog) family of macros,
//! which forward to a single global [`LogFn`]. Until the host installs one
//! (with [`set_log_fn`] or [`init_logger`]) every message is a silent no-op,
//! so the driver crates never depend on a particular output device.
//!
//! [`init_logger`] installs the global [`Logger`], which fans each message
//! out to every registered [`LogSink`] whose level filter accepts it.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::{self, Write as _};
use core::sync::atomic::{AtomicPtr, Ordering};

use crate::sync::SpinLock;

// ---------------------------------------------------------------------------
// Log levels (lower = more severe)
// ---------------------------------------------------------------------------

/// Log severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    /// Fatal: unrecoverable error.
    Fatal = 0,
    /// Error: something failed but the system may continue.
    Error = 1,
    /// Warning: unexpected condition, not necessarily an error.
    Warn = 2,
    /// Informational: high-level progress messages.
    Info = 3,
    /// Debug: detailed diagnostic information.
    Debug = 4,
    /// Trace: very verbose, low-level tracing.
    Trace = 5,
}

impl LogLevel {
    /// Returns the human-readable name (fixed-width for aligned output).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Warn => "WARN ",
            Self::Info => "INFO ",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }

    /// Parses a lowercase level name (`"error"`, `"warn"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fatal" => Some(Self::Fatal),
            "error" => Some(Self::Error),
            "warn" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Leveled log function (klog! and convenience macros)
// ---------------------------------------------------------------------------

/// The signature of the global leveled log function.
pub type LogFn = fn(LogLevel, fmt::Arguments<'_>);

fn null_log(_level: LogLevel, _args: fmt::Arguments<'_>) {}

static LOG_FN: AtomicPtr<()> = AtomicPtr::new(null_log as *mut ());

/// Registers the global leveled log function.
///
/// # Safety
///
/// The provided function must be safe to call from any context. May be called
/// more than once. Uses `Release` ordering so subsequent loads see the new
/// function.
pub unsafe fn set_log_fn(f: LogFn) {
    LOG_FN.store(f as *mut (), Ordering::Release);
}

#[inline]
fn load_log_fn() -> LogFn {
    let ptr = LOG_FN.load(Ordering::Acquire);
    // SAFETY: We only ever store valid `LogFn` function pointers into LOG_FN.
    unsafe { core::mem::transmute::<*mut (), LogFn>(ptr) }
}

/// Implementation detail for [`klog!`](crate::klog). Not public API.
#[doc(hidden)]
pub fn _log(level: LogLevel, args: fmt::Arguments<'_>) {
    load_log_fn()(level, args);
}

/// Logs a message at the given level.
#[macro_export]
macro_rules! klog {
    ($level:expr, $($arg:tt)*) => {
        $crate::log::_log($level, format_args!($($arg)*))
    };
}

/// Logs a fatal-level message (level 0).
#[macro_export]
macro_rules! kfatal {
    ($($arg:tt)*) => { $crate::klog!($crate::log::LogLevel::Fatal, $($arg)*) };
}

/// Logs an error-level message (level 1).
#[macro_export]
macro_rules! kerr {
    ($($arg:tt)*) => { $crate::klog!($crate::log::LogLevel::Error, $($arg)*) };
}

/// Logs a warning-level message (level 2).
#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => { $crate::klog!($crate::log::LogLevel::Warn, $($arg)*) };
}

/// Logs an info-level message (level 3).
#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => { $crate::klog!($crate::log::LogLevel::Info, $($arg)*) };
}

/// Logs a debug-level message (level 4).
#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => { $crate::klog!($crate::log::LogLevel::Debug, $($arg)*) };
}

/// Logs a trace-level message (level 5).
#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => { $crate::klog!($crate::log::LogLevel::Trace, $($arg)*) };
}

// ---------------------------------------------------------------------------
// LogSink trait
// ---------------------------------------------------------------------------

/// A dyn-compatible output sink for the [`Logger`].
pub trait LogSink: Send + Sync {
    /// Write a string fragment to this sink.
    fn write_str(&self, s: &str);
    /// Maximum log level accepted (messages with `level <= max_level` are written).
    fn max_level(&self) -> LogLevel;
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

/// Fan-out logger.
///
/// Holds a `Vec<Box<dyn LogSink>>` behind a [`SpinLock`]. Construct with
/// [`Logger::new`] (const) and store in a `static`.
pub struct Logger {
    sinks: SpinLock<Vec<Box<dyn LogSink>>>,
}

impl Logger {
    /// Creates a logger with no sinks. Writes are silent until a sink is added.
    pub const fn new() -> Self {
        Self {
            sinks: SpinLock::named("logger", Vec::new()),
        }
    }

    /// Registers an additional output sink.
    pub fn add_sink(&self, sink: Box<dyn LogSink>) {
        self.sinks.lock().push(sink);
    }

    /// Formats a level-tagged message and writes it to every sink whose
    /// `max_level >= level`.
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        let level_str = level.name();
        let sinks = self.sinks.lock();
        for sink in sinks.iter() {
            if level <= sink.max_level() {
                let mut w = SinkWriter(sink.as_ref());
                let _ = writeln!(w, "{level_str} {args}");
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter that wraps a `&dyn LogSink` to implement `fmt::Write`.
struct SinkWriter<'a>(&'a dyn LogSink);

impl fmt::Write for SinkWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Global logger instance and public API
// ---------------------------------------------------------------------------

/// Global logger instance.
pub static LOGGER: Logger = Logger::new();

fn logger_log(level: LogLevel, args: fmt::Arguments<'_>) {
    LOGGER.log(level, args);
}

/// Installs the global [`Logger`] as the log function.
pub fn init_logger() {
    // SAFETY: logger_log only takes the logger's own lock and writes to sinks.
    unsafe { set_log_fn(logger_log) };
}

/// Registers an additional output sink with the global logger.
pub fn add_sink(sink: Box<dyn LogSink>) {
    LOGGER.add_sink(sink);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use std::sync::Arc;

    struct CaptureSink {
        buf: Arc<SpinLock<String>>,
        max_level: LogLevel,
    }

    impl LogSink for CaptureSink {
        fn write_str(&self, s: &str) {
            self.buf.lock().push_str(s);
        }

        fn max_level(&self) -> LogLevel {
            self.max_level
        }
    }

    fn capture(logger: &Logger, max_level: LogLevel) -> Arc<SpinLock<String>> {
        let buf = Arc::new(SpinLock::new(String::new()));
        logger.add_sink(Box::new(CaptureSink {
            buf: Arc::clone(&buf),
            max_level,
        }));
        buf
    }

    #[test]
    fn level_names_are_fixed_width() {
        for level in [
            LogLevel::Fatal,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            assert_eq!(level.name().len(), 5);
        }
    }

    #[test]
    fn parse_level_names() {
        assert_eq!(LogLevel::from_name("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_name("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_name("WARN"), None);
        assert_eq!(LogLevel::from_name("verbose"), None);
    }

    #[test]
    fn logger_filters_by_sink_level() {
        let logger = Logger::new();
        let info = capture(&logger, LogLevel::Info);
        let trace = capture(&logger, LogLevel::Trace);

        logger.log(LogLevel::Debug, format_args!("gpe {:#x}", 0x4f));
        logger.log(LogLevel::Error, format_args!("failed"));

        assert_eq!(&*info.lock(), "ERROR failed\n");
        assert_eq!(&*trace.lock(), "DEBUG gpe 0x4f\nERROR failed\n");
    }
}
