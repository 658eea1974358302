use crate::dsn::Dsn;
use crate::report::{ErrorReport, EventId, TrailEntry};
use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

pub type BoxError = Box<dyn Error + Send + Sync>;

/// Callback a client invokes when a capture fails after it has already
/// acknowledged the report (for example, a transport error on a background
/// worker).
pub type FailureCallback = Arc<dyn Fn(&(dyn Error + 'static)) + Send + Sync>;

/// Parameters a client is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub dsn: Dsn,
    pub timeout: Duration,
    pub environment: String,
    pub release: Option<String>,
}

/// Remote error-tracking client the forwarder dispatches to.
///
/// Implementations own transport, retries and the breadcrumb buffer. They
/// are called synchronously from whatever thread emitted the event, so
/// `capture` and `add_trail` must not block on network I/O.
#[async_trait]
pub trait CaptureClient: Send + Sync {
    /// Submit a report.
    ///
    /// **Returns**
    /// - `Ok(Some(id))` if the client accepted the report.
    /// - `Ok(None)` if the client silently declined it; the forwarder treats
    ///   this as a delivery failure.
    /// - `Err(..)` if the capture itself failed.
    fn capture(&self, report: &ErrorReport) -> Result<Option<EventId>, BoxError>;

    /// Append a breadcrumb to the client's rolling buffer.
    fn add_trail(&self, entry: TrailEntry) -> Result<(), BoxError>;

    /// Install or clear the failure callback.
    fn set_failure_callback(&self, callback: Option<FailureCallback>);

    /// Wait until everything accepted so far has been handed to the
    /// transport.
    ///
    /// Default implementation is a no-op.
    async fn flush(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Builds the client on first use.
pub trait ClientFactory: Send + Sync {
    fn create(&self, options: ClientOptions) -> Result<Arc<dyn CaptureClient>, BoxError>;
}

impl<F> ClientFactory for F
where
    F: Fn(ClientOptions) -> Result<Arc<dyn CaptureClient>, BoxError> + Send + Sync,
{
    fn create(&self, options: ClientOptions) -> Result<Arc<dyn CaptureClient>, BoxError> {
        self(options)
    }
}
