use crate::bootstrap::ClientBootstrap;
use crate::client::{BoxError, CaptureClient, ClientFactory, ClientOptions};
use crate::config::{FailurePolicy, ForwarderConfig};
use crate::diagnostics;
use crate::error::ForwardError;
use crate::event::LogEvent;
use crate::level::{error_level_of, trail_level_of};
use crate::properties::{flatten, PropertyDestination};
use crate::report::{ErrorReport, EventId, ReportPayload, TrailEntry};
use std::sync::Arc;
use std::time::Duration;

/// What happened to a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Below the report threshold; appended as a trail entry.
    Trail,
    /// Sent as a report and acknowledged.
    Reported(EventId),
    /// Report-level event without a failure, ignored by configuration.
    Dropped,
    /// Forwarding failed and the failure policy swallowed the error.
    Undelivered,
}

/// Classifies events, enriches them and dispatches them to the capture
/// client.
///
/// `Forwarder` is `Send + Sync`; share it behind an `Arc` and call
/// [`Forwarder::write`] from any thread.
pub struct Forwarder {
    config: ForwarderConfig,
    bootstrap: ClientBootstrap,
}

impl Forwarder {
    /// Forwarder using the built-in HTTP client.
    #[cfg(feature = "http")]
    pub fn new(config: ForwarderConfig) -> Self {
        Self::with_factory(config, crate::http::HttpCaptureClient::factory)
    }

    /// Forwarder that builds its client with `factory` on first use.
    pub fn with_factory(config: ForwarderConfig, factory: impl ClientFactory + 'static) -> Self {
        let bootstrap = ClientBootstrap::new(&config, Box::new(factory));
        Forwarder { config, bootstrap }
    }

    /// Forwarder around an existing client. The client still goes through
    /// the bootstrap, so it receives the failure callback on first use.
    pub fn with_client(config: ForwarderConfig, client: Arc<dyn CaptureClient>) -> Self {
        Self::with_factory(config, move |_: ClientOptions| -> Result<Arc<dyn CaptureClient>, BoxError> {
            Ok(Arc::clone(&client))
        })
    }

    pub fn config(&self) -> &ForwarderConfig {
        &self.config
    }

    pub fn bootstrap(&self) -> &ClientBootstrap {
        &self.bootstrap
    }

    /// Forward one event.
    ///
    /// **Returns**
    /// - `Ok(outcome)` describing how the event was handled.
    /// - `Err(..)` if the trail append, client construction or dispatch
    ///   failed, or the client returned no acknowledgment. The failure is
    ///   always recorded to the diagnostic log first. With
    ///   [`FailurePolicy::Swallow`] the error is replaced by
    ///   [`Outcome::Undelivered`].
    pub fn write(&self, event: &LogEvent) -> Result<Outcome, ForwardError> {
        match self.route(event) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                diagnostics::record_failure(&self.config.name, &err);
                match self.config.failure_policy {
                    FailurePolicy::Propagate => Err(err),
                    FailurePolicy::Swallow => Ok(Outcome::Undelivered),
                }
            }
        }
    }

    fn route(&self, event: &LogEvent) -> Result<Outcome, ForwardError> {
        if event.level < self.config.minimum_report_level {
            let entry = self.trail_entry(event);
            self.bootstrap
                .client()?
                .add_trail(entry)
                .map_err(ForwardError::Trail)?;
            return Ok(Outcome::Trail);
        }

        if event.failure.is_none() && self.config.ignore_events_without_failure {
            return Ok(Outcome::Dropped);
        }

        let report = self.report(event);
        let ack = self
            .bootstrap
            .client()?
            .capture(&report)
            .map_err(ForwardError::Capture)?;

        ack.map(Outcome::Reported).ok_or(ForwardError::MissingAcknowledgment)
    }

    /// Build the report for an event at or above the threshold.
    pub fn report(&self, event: &LogEvent) -> ErrorReport {
        let properties = PropertyDestination::new(
            flatten(event.properties.as_ref()),
            self.config.send_properties_as_tags,
        );

        let payload = match &event.failure {
            None => ReportPayload::Message {
                message: self.config.layout.render(event),
            },
            Some(failure) => ReportPayload::Failure {
                failure: failure.clone(),
                message: event.message.clone(),
            },
        };

        ErrorReport {
            timestamp: event.timestamp,
            logger: event.logger.clone(),
            level: error_level_of(event.level),
            payload,
            properties,
        }
    }

    /// Build the breadcrumb for an event below the threshold.
    pub fn trail_entry(&self, event: &LogEvent) -> TrailEntry {
        let data = flatten(event.properties.as_ref());
        TrailEntry {
            timestamp: event.timestamp,
            category: event.logger.clone(),
            level: trail_level_of(event.level),
            message: self.config.layout.render(event),
            data: (!data.is_empty()).then_some(data),
        }
    }

    /// Wait up to `timeout` for the client to hand off everything accepted
    /// so far. Returns `false` on timeout or flush failure. A forwarder that
    /// never constructed its client has nothing to flush.
    pub async fn flush(&self, timeout: Duration) -> bool {
        let Some(client) = self.bootstrap.get() else {
            return true;
        };
        match tokio::time::timeout(timeout, client.flush()).await {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                diagnostics::record_failure(&self.config.name, &*err);
                false
            }
            Err(_) => false,
        }
    }

    /// Disposal hook: detach the client's failure callback from this
    /// forwarder.
    pub fn close(&self) {
        self.bootstrap.teardown();
    }
}
