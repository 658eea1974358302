use crate::level::Severity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;

/// Structured property bag attached to an event.
pub type PropertyBag = BTreeMap<String, serde_json::Value>;

/// One log event as produced by the host framework.
///
/// The forwarder only ever borrows events; it never mutates them.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: Severity,
    /// Logger or source name (the `tracing` target for layer-produced events).
    pub logger: String,
    /// Formatted message.
    pub message: String,
    pub failure: Option<Failure>,
    pub properties: Option<PropertyBag>,
}

impl LogEvent {
    pub fn new(level: Severity, logger: impl Into<String>, message: impl Into<String>) -> Self {
        LogEvent {
            timestamp: Utc::now(),
            level,
            logger: logger.into(),
            message: message.into(),
            failure: None,
            properties: None,
        }
    }

    pub fn with_failure(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Add a single property, creating the bag on first use.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Failure object attached to an event, detached from the original error so
/// it can be cloned into reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Best-effort type name of the error.
    pub type_name: String,
    pub message: String,
    /// Messages of the `source()` chain, outermost first.
    pub sources: Vec<String>,
}

impl Failure {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Failure {
            type_name: type_name.into(),
            message: message.into(),
            sources: Vec::new(),
        }
    }

    /// Capture an error and its source chain.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut sources = Vec::new();
        let mut next = err.source();
        while let Some(source) = next {
            sources.push(source.to_string());
            next = source.source();
        }

        Failure {
            type_name: type_name_from_debug(&format!("{:?}", err)),
            message: err.to_string(),
            sources,
        }
    }
}

/// Derive a type name from the leading identifier of a `Debug` rendering,
/// e.g. `ParseIntError { kind: InvalidDigit }` becomes `ParseIntError`.
fn type_name_from_debug(debug: &str) -> String {
    let name: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == ':')
        .collect();
    if name.is_empty() {
        "Error".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(Inner);

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Oh No!")
        }
    }

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("root cause")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    impl Error for Inner {}

    #[test]
    fn failure_captures_message_and_chain() {
        let failure = Failure::from_error(&Outer(Inner));
        assert_eq!(failure.type_name, "Outer");
        assert_eq!(failure.message, "Oh No!");
        assert_eq!(failure.sources, vec!["root cause".to_string()]);
    }

    #[test]
    fn type_name_falls_back_for_odd_debug_output() {
        assert_eq!(type_name_from_debug("ParseIntError { kind: Empty }"), "ParseIntError");
        assert_eq!(type_name_from_debug("\"quoted\""), "Error");
    }

    #[test]
    fn with_property_builds_bag() {
        let event = LogEvent::new(Severity::Info, "app", "hello")
            .with_property("tag1", "abcde")
            .with_property("count", 3);
        let bag = event.properties.expect("properties");
        assert_eq!(bag.len(), 2);
        assert_eq!(bag["count"], serde_json::json!(3));
    }
}
