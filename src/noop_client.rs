use crate::client::{BoxError, CaptureClient, FailureCallback};
use crate::report::{ErrorReport, EventId, TrailEntry};
use async_trait::async_trait;

/// A client that acknowledges every report and drops it.
///
/// Useful for measuring the overhead of the forwarder itself without any
/// external I/O, and for tests that don't care about delivery.
#[derive(Clone, Default)]
pub struct NoopClient;

#[async_trait]
impl CaptureClient for NoopClient {
    fn capture(&self, _report: &ErrorReport) -> Result<Option<EventId>, BoxError> {
        Ok(Some(EventId::new()))
    }

    fn add_trail(&self, _entry: TrailEntry) -> Result<(), BoxError> {
        Ok(())
    }

    fn set_failure_callback(&self, _callback: Option<FailureCallback>) {}
}
