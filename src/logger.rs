//! Verbosity-gated logger with an optional in-memory capture buffer
//!
//! Log lines go to stderr so command output on stdout stays machine-readable.
//! [`OutputMode::Memory`] captures entries instead, for callers that inspect
//! what was logged.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// How much the logger prints
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VerbosityLevel {
    /// No log output
    Silent = 0,
    /// Only final outcomes
    Minimal = 1,
    /// Per-file and per-step progress (default)
    #[default]
    Normal = 2,
    /// Everything, including dropped lines and per-player updates
    Verbose = 3,
}

impl std::str::FromStr for VerbosityLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityLevel::Silent),
            "minimal" | "1" => Ok(VerbosityLevel::Minimal),
            "normal" | "2" => Ok(VerbosityLevel::Normal),
            "verbose" | "3" => Ok(VerbosityLevel::Verbose),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stderr (default)
    #[default]
    Stderr,
    /// Capture only to in-memory buffer
    Memory,
}

/// A captured log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g. "parse", "closeout")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Read-only access to captured entries; derefs to `[LogEntry]`
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

pub struct Logger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl Logger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        Logger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    /// Capture to memory only
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn disable_capture(&mut self) {
        self.output_mode = OutputMode::Stderr;
    }

    pub fn is_capturing(&self) -> bool {
        self.output_mode == OutputMode::Memory
    }

    /// Captured entries
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, None, message);
    }

    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, None, message);
    }

    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, None, message);
    }

    /// Log a categorized message at `level`
    pub fn categorized(&self, level: VerbosityLevel, category: &str, message: &str) {
        self.log(level, Some(category), message);
    }

    fn log(&self, level: VerbosityLevel, category: Option<&str>, message: &str) {
        if level == VerbosityLevel::Silent {
            return;
        }

        let capture = self.is_capturing();
        if !capture && level > self.verbosity {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            category: category.map(str::to_string),
        };

        if capture {
            self.log_buffer.borrow_mut().push(entry);
        } else {
            self.emit(&entry);
        }
    }

    fn emit(&self, entry: &LogEntry) {
        match self.output_format {
            OutputFormat::Text => match (&entry.category, entry.level) {
                (Some(category), _) => eprintln!("  [{category}] {}", entry.message),
                (None, VerbosityLevel::Minimal) => eprintln!("{}", entry.message),
                (None, _) => eprintln!("  {}", entry.message),
            },
            OutputFormat::Json => match serde_json::to_string(entry) {
                Ok(line) => eprintln!("{line}"),
                Err(_) => eprintln!("{}", entry.message),
            },
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}
