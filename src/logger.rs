//! Line-oriented file logger shared by all connection threads
//!
//! Every record is one line appended to the log file. The writer sits behind
//! a mutex so concurrent connection threads never interleave a single line.
//! Records are mirrored to the [`log`] facade, so an embedding binary that
//! installs `env_logger` also gets console output.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Utc;

/// Default log file, created in the working directory
pub const DEFAULT_LOG_FILE: &str = "skiff.log";

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Closest `log` facade level; the facade has no CRITICAL.
    fn facade(&self) -> log::Level {
        match self {
            Level::Info => log::Level::Info,
            Level::Warning => log::Level::Warn,
            Level::Error | Level::Critical => log::Level::Error,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cheaply cloneable handle to a shared log file writer.
///
/// Logging is fire-and-forget: a failed write is reported on stderr and
/// otherwise swallowed - the server never stops serving because the log
/// file went away.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<Mutex<LineWriter<File>>>,
}

impl Logger {
    /// Open (or create) the default log file for appending.
    pub fn create() -> std::io::Result<Self> {
        Self::with_file(DEFAULT_LOG_FILE)
    }

    /// Open (or create) `path` for appending.
    pub fn with_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { sink: Arc::new(Mutex::new(LineWriter::new(file))) })
    }

    /// Append one formatted record and mirror it to the `log` facade.
    pub fn log(&self, level: Level, message: &str) {
        log::log!(level.facade(), "{}", message);

        let line = format_line(level, message);
        let mut sink = match self.sink.lock() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(sink, "{}", line) {
            eprintln!("failed to write log line: {}", e);
        }
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    pub fn critical(&self, message: &str) {
        self.log(Level::Critical, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

fn format_line(level: Level, message: &str) -> String {
    format!("[skiff] {} | {} | {}", Utc::now().to_rfc3339(), level, message)
}
