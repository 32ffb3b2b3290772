//! Structured log records produced by the routing core
//!
//! The core never writes to a sink. Callers collect the records returned by
//! `build_manifest` and forward them wherever the host process logs, usually
//! through [`LogRecord::emit`].

use serde::Serialize;

/// Label used for every router-originated record
pub const ROUTER_LABEL: &str = "router";

/// Label used for static param validation records
pub const STATIC_PATHS_LABEL: &str = "static-paths";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// One `{ label, level, message, newLine }` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub label: String,
    pub level: LogLevel,
    pub message: String,
    pub new_line: bool,
}

impl LogRecord {
    pub fn new(label: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            level,
            message: message.into(),
            new_line: true,
        }
    }

    pub fn warn(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(label, LogLevel::Warn, message)
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warn
    }

    /// Forwards the record to `tracing` at the matching level
    ///
    /// # Examples
    ///
    /// ```
    /// use pagewright_router::LogRecord;
    ///
    /// LogRecord::warn("router", "A static route cannot be defined more than once.").emit();
    /// ```
    pub fn emit(&self) {
        let label = self.label.as_str();
        match self.level {
            LogLevel::Debug => tracing::debug!(label, "{}", self.message),
            LogLevel::Info => tracing::info!(label, "{}", self.message),
            LogLevel::Warn => tracing::warn!(label, "{}", self.message),
            LogLevel::Error => tracing::error!(label, "{}", self.message),
        }
    }
}
