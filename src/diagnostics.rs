//! The forwarder's own failure log.
//!
//! Everything here is emitted through `tracing` under [`DIAGNOSTIC_TARGET`].
//! [`ForwardLayer`](crate::layer::ForwardLayer) never forwards events from
//! this crate, nor events emitted on a thread marked with
//! [`mark_transport_thread`], so neither a failure report nor the HTTP
//! stack's own logging can loop back into the forwarder.

use crate::client::FailureCallback;
use std::cell::Cell;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error};

pub const DIAGNOSTIC_TARGET: &str = "tracing_error_forwarder::diagnostics";

/// Whether an event target belongs to this crate.
pub fn is_internal_target(target: &str) -> bool {
    target == env!("CARGO_CRATE_NAME") || target.starts_with(concat!(env!("CARGO_CRATE_NAME"), "::"))
}

thread_local! {
    static TRANSPORT_THREAD: Cell<bool> = const { Cell::new(false) };
}

/// Mark the current thread as carrying client transport work. Events
/// emitted on it afterwards are never forwarded.
///
/// Custom clients that do network I/O on their own threads should call
/// this at the start of each such thread.
pub fn mark_transport_thread() {
    TRANSPORT_THREAD.with(|flag| flag.set(true));
}

pub fn is_transport_thread() -> bool {
    TRANSPORT_THREAD.with(Cell::get)
}

pub fn record_failure(adapter: &str, err: &(dyn Error + 'static)) {
    error!(target: DIAGNOSTIC_TARGET, adapter, "Unable to send error report: {}", err);
}

pub fn record_client_constructed(adapter: &str, release: Option<&str>, environment: &str) {
    debug!(
        target: DIAGNOSTIC_TARGET,
        adapter,
        release = release.unwrap_or("<none>"),
        environment,
        "capture client constructed"
    );
}

/// Failure callback wired into every client: records capture-time errors
/// under the adapter's name.
pub fn failure_callback(adapter: Arc<str>) -> FailureCallback {
    Arc::new(move |err: &(dyn Error + 'static)| record_failure(&adapter, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_crate_targets() {
        assert!(is_internal_target(DIAGNOSTIC_TARGET));
        assert!(is_internal_target("tracing_error_forwarder"));
        assert!(is_internal_target("tracing_error_forwarder::http"));
        assert!(!is_internal_target("tracing_error_forwarder_ext"));
        assert!(!is_internal_target("my_service::handler"));
    }

    #[test]
    fn transport_marking_is_per_thread() {
        let marked = std::thread::spawn(|| {
            mark_transport_thread();
            is_transport_thread()
        })
        .join()
        .unwrap();
        assert!(marked);
        assert!(!is_transport_thread());
    }
}
