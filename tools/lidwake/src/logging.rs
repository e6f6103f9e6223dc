//! Stderr sink for the driver log.

use lidwake_core::log::{self, LogLevel, LogSink};

/// Writes log lines to stderr, keeping stdout for command output.
struct StderrSink {
    max_level: LogLevel,
}

impl LogSink for StderrSink {
    fn write_str(&self, s: &str) {
        eprint!("{s}");
    }

    fn max_level(&self) -> LogLevel {
        self.max_level
    }
}

/// Installs the global logger with a stderr sink filtered at `max_level`.
pub fn init(max_level: LogLevel) {
    log::init_logger();
    log::add_sink(Box::new(StderrSink { max_level }));
}
