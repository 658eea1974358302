use crate::diagnostics;
use crate::event::{Failure, LogEvent, PropertyBag};
use crate::level::Severity;
use crate::router::Forwarder;
use chrono::Utc;
use std::error::Error;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that turns every event into a [`LogEvent`]
/// and hands it to a [`Forwarder`] on the emitting thread.
///
/// Events emitted by this crate itself (including its diagnostics) and
/// events emitted on client transport threads are never forwarded. Forwarding failures are already recorded by the
/// forwarder; the layer only counts them.
pub struct ForwardLayer {
    forwarder: Arc<Forwarder>,
    /// Total events seen by the layer.
    pub total_events: Arc<AtomicU64>,
    /// Events handled without error (trail, report, drop).
    pub forwarded_events: Arc<AtomicU64>,
    /// Events whose forwarding failed.
    pub failed_events: Arc<AtomicU64>,
}

impl ForwardLayer {
    pub fn new(forwarder: Arc<Forwarder>) -> Self {
        Self {
            forwarder,
            total_events: Arc::new(AtomicU64::new(0)),
            forwarded_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn forwarder(&self) -> &Arc<Forwarder> {
        &self.forwarder
    }
}

impl<S> Layer<S> for ForwardLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if diagnostics::is_internal_target(meta.target()) || diagnostics::is_transport_thread() {
            return;
        }
        self.total_events.fetch_add(1, Ordering::Relaxed);

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let log_event = LogEvent {
            timestamp: Utc::now(),
            level: Severity::from(meta.level()),
            logger: meta.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            failure: visitor.failure,
            properties: (!visitor.fields.is_empty()).then_some(visitor.fields),
        };

        match self.forwarder.write(&log_event) {
            Ok(_) => self.forwarded_events.fetch_add(1, Ordering::Relaxed),
            Err(_) => self.failed_events.fetch_add(1, Ordering::Relaxed),
        };
    }
}

/// Collects the message, the first error value and all other fields of an
/// event.
#[derive(Default)]
pub struct FieldVisitor {
    pub fields: PropertyBag,
    pub message: Option<String>,
    pub failure: Option<Failure>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: serde_json::Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, serde_json::Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        if self.failure.is_none() {
            self.failure = Some(Failure::from_error(value));
        } else {
            self.insert(field, serde_json::Value::String(value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.insert(field, serde_json::Value::String(format!("{:?}", value)));
        }
    }
}
