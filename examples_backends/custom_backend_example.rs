use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_error_forwarder::{
    client::{BoxError, CaptureClient, FailureCallback},
    init::init_forwarding,
    report::{ErrorReport, EventId, TrailEntry},
    Forwarder, ForwarderConfig, Severity,
};

/// Example of integrating a completely custom backend by implementing
/// the `CaptureClient` trait directly. Imagine this talks to some
/// proprietary error tracker for which this crate does not provide a
/// built-in client.
struct MyCustomTracker;

impl CaptureClient for MyCustomTracker {
    fn capture(&self, report: &ErrorReport) -> Result<Option<EventId>, BoxError> {
        // Here you would call your own client library for the tracker.
        // For the sake of example we just print the report.
        println!("[my-custom-tracker] report {:?}", report);
        Ok(Some(EventId::new()))
    }

    fn add_trail(&self, entry: TrailEntry) -> Result<(), BoxError> {
        println!("[my-custom-tracker] breadcrumb {:?}", entry);
        Ok(())
    }

    fn set_failure_callback(&self, _callback: Option<FailureCallback>) {}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ForwarderConfig::from_endpoint("https://public@tracker.example.com/7")?
        .with_minimum_report_level(Severity::Warn);
    let forwarder = Arc::new(Forwarder::with_client(config, Arc::new(MyCustomTracker)));

    init_forwarding(Arc::clone(&forwarder))?;

    info!("custom backend example started");
    warn!(db = "my-custom-db", "simulated warning sent via custom backend");
    error!(db = "my-custom-db", "simulated error sent via custom backend");

    forwarder.close();
    Ok(())
}
