//! Diagnostics sink used by readers and writers.
//!
//! Every advisory and failure produced while normalizing a directory is
//! appended to a [`Diagnostics`] implementation supplied by the caller.
//! [`MessageLog`] is the stock implementation: it keeps the entries and
//! mirrors each one to `tracing`.
//!
//! # Example
//!
//! ```rust
//! use tiffnorm_core::{Diagnostics, MessageLog, Severity};
//!
//! let mut log = MessageLog::new();
//! log.append("strip 2 is short".into(), Severity::Warning);
//! assert_eq!(log.warnings().count(), 1);
//! assert!(!log.has_errors());
//! ```

use tracing::{debug, error, warn};

/// Severity of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational
    Message,
    /// Processing continues, result may be degraded
    Warning,
    /// Operation failed
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Message => "message",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Receiver of diagnostic messages.
pub trait Diagnostics {
    /// Appends a message with the given severity.
    fn append(&mut self, message: String, severity: Severity);

    /// Appends a [`Severity::Warning`] message.
    fn warning(&mut self, message: String) {
        self.append(message, Severity::Warning);
    }

    /// Appends a [`Severity::Error`] message.
    fn error(&mut self, message: String) {
        self.append(message, Severity::Error);
    }
}

/// One logged entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Entry severity
    pub severity: Severity,
    /// Human readable text
    pub message: String,
}

/// Collecting diagnostics sink.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Vec<LogEntry>,
}

impl MessageLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries in arrival order.
    #[inline]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries with [`Severity::Warning`].
    pub fn warnings(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.severity == Severity::Warning)
    }

    /// Entries with [`Severity::Error`].
    pub fn errors(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.severity == Severity::Error)
    }

    /// Whether any error was logged.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Diagnostics for MessageLog {
    fn append(&mut self, message: String, severity: Severity) {
        match severity {
            Severity::Message => debug!("{message}"),
            Severity::Warning => warn!("{message}"),
            Severity::Error => error!("{message}"),
        }
        self.entries.push(LogEntry { severity, message });
    }
}
