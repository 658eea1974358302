use crate::event::Failure;
use crate::level::{ErrorLevel, TrailLevel};
use crate::properties::{Properties, PropertyDestination};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Acknowledgment token returned by a client for an accepted report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        EventId(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        EventId(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Body of a report: either just a rendered message, or a failure with the
/// formatted message as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum ReportPayload {
    Message { message: String },
    Failure { failure: Failure, message: String },
}

/// Top-level payload handed to [`CaptureClient::capture`](crate::client::CaptureClient::capture).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub timestamp: DateTime<Utc>,
    pub logger: String,
    pub level: ErrorLevel,
    pub payload: ReportPayload,
    pub properties: PropertyDestination,
}

impl ErrorReport {
    pub fn message(&self) -> &str {
        match &self.payload {
            ReportPayload::Message { message } => message,
            ReportPayload::Failure { message, .. } => message,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match &self.payload {
            ReportPayload::Message { .. } => None,
            ReportPayload::Failure { failure, .. } => Some(failure),
        }
    }

    pub fn tags(&self) -> Option<&Properties> {
        self.properties.tags()
    }

    pub fn extras(&self) -> Option<&Properties> {
        self.properties.extras()
    }
}

/// Breadcrumb appended to the client's rolling buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailEntry {
    pub timestamp: DateTime<Utc>,
    /// Logger name of the originating event.
    pub category: String,
    pub level: TrailLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Properties>,
}
