//! Non-fatal findings recorded while finalizing a file.

use std::fmt;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Something the author of the templates should look at.
    Warning,
    /// A change the finalizer made (e.g. a removed import).
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message from a finalizer phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// The phase that produced this diagnostic.
    pub phase: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(phase: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            phase,
            message: message.into(),
        }
    }

    pub fn info(phase: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            phase,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.phase, self.message)
    }
}
