use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Severity of a host log event, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// Severity scale used for reports sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

/// Severity scale used for breadcrumbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

/// Map a host severity onto the report severity scale.
pub fn error_level_of(level: Severity) -> ErrorLevel {
    match level {
        Severity::Trace | Severity::Debug => ErrorLevel::Debug,
        Severity::Info => ErrorLevel::Info,
        Severity::Warn => ErrorLevel::Warning,
        Severity::Error => ErrorLevel::Error,
        Severity::Fatal => ErrorLevel::Fatal,
    }
}

/// Map a host severity onto the breadcrumb severity scale.
pub fn trail_level_of(level: Severity) -> TrailLevel {
    match level {
        Severity::Trace | Severity::Debug => TrailLevel::Debug,
        Severity::Info => TrailLevel::Info,
        Severity::Warn => TrailLevel::Warning,
        Severity::Error => TrailLevel::Error,
        Severity::Fatal => TrailLevel::Critical,
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "Trace",
            Severity::Debug => "Debug",
            Severity::Info => "Info",
            Severity::Warn => "Warn",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a severity name is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown severity level `{0}`")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

// tracing has no fatal level; only direct callers produce `Severity::Fatal`.
impl From<&tracing::Level> for Severity {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => Severity::Trace,
            tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warn,
            tracing::Level::ERROR => Severity::Error,
        }
    }
}
