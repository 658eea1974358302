#![cfg(feature = "http")]

// Installs a global subscriber, so this lives in its own test binary.

use mockito::Server;
use std::sync::Arc;
use std::time::Duration;
use tracing_error_forwarder::init::{init_forwarding_with_config, LayerConfig};
use tracing_error_forwarder::{Forwarder, ForwarderConfig};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn one_application_error_posts_exactly_one_report() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/42/store/")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    // Default threshold is Trace, so any HTTP stack event that reached the
    // layer would become a report of its own.
    let endpoint = format!("http://public:secret@{}/42", server.host_with_port());
    let forwarder = Arc::new(Forwarder::new(ForwarderConfig::from_endpoint(&endpoint).unwrap()));
    init_forwarding_with_config(Arc::clone(&forwarder), LayerConfig { enable_stdout: false }).unwrap();

    tracing::error!("payment declined");

    assert!(forwarder.flush(Duration::from_secs(5)).await);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(forwarder.flush(Duration::from_secs(5)).await);

    mock.assert_async().await;
}
