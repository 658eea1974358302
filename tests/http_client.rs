#![cfg(feature = "http")]

use chrono::Utc;
use mockito::{Matcher, Server};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_error_forwarder::client::{CaptureClient, ClientOptions, FailureCallback};
use tracing_error_forwarder::dsn::parse_dsn;
use tracing_error_forwarder::http::HttpCaptureClient;
use tracing_error_forwarder::level::ErrorLevel;
use tracing_error_forwarder::properties::PropertyDestination;
use tracing_error_forwarder::report::{ErrorReport, ReportPayload};
use tracing_error_forwarder::{Failure, Forwarder, ForwarderConfig, LogEvent, Outcome, Severity};

fn dsn_for(server: &Server) -> String {
    format!("http://public:secret@{}/42", server.host_with_port())
}

#[tokio::test]
async fn reports_are_posted_to_the_store_endpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/42/store/")
        .match_header("content-type", "application/json")
        .match_header("x-sentry-auth", Matcher::Regex("sentry_key=public".to_string()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "level": "error",
            "message": "Error Message",
            "environment": "staging",
            "release": "2.1.0",
            "tags": { "tag1": "abcde" },
            "exception": { "values": [{ "type": "Exception", "value": "Oh No!" }] },
        })))
        .with_status(200)
        .create_async()
        .await;

    let config = ForwarderConfig::from_endpoint(&dsn_for(&server))
        .unwrap()
        .with_environment("staging")
        .with_release("2.1.0")
        .with_properties_as_tags(true);
    let forwarder = Forwarder::new(config);

    let event = LogEvent::new(Severity::Error, "app", "Error Message")
        .with_failure(Failure::new("Exception", "Oh No!"))
        .with_property("tag1", "abcde");
    let outcome = forwarder.write(&event).unwrap();
    assert!(matches!(outcome, Outcome::Reported(_)));

    assert!(forwarder.flush(Duration::from_secs(5)).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn breadcrumbs_travel_with_the_next_report() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/42/store/")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "breadcrumbs": { "values": [{ "category": "app::cache", "level": "debug", "message": "cache miss" }] },
        })))
        .with_status(200)
        .create_async()
        .await;

    let config = ForwarderConfig::from_endpoint(&dsn_for(&server))
        .unwrap()
        .with_minimum_report_level(Severity::Info);
    let forwarder = Forwarder::new(config);

    assert_eq!(
        forwarder.write(&LogEvent::new(Severity::Debug, "app::cache", "cache miss")).unwrap(),
        Outcome::Trail
    );
    forwarder.write(&LogEvent::new(Severity::Error, "app", "boom")).unwrap();

    assert!(forwarder.flush(Duration::from_secs(5)).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn transport_failures_reach_the_failure_callback() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/42/store/")
        .with_status(500)
        .with_body("upstream down")
        .create_async()
        .await;

    let options = ClientOptions {
        dsn: parse_dsn(&dsn_for(&server)).unwrap(),
        timeout: Duration::from_secs(5),
        environment: "develop".to_string(),
        release: None,
    };
    let client = HttpCaptureClient::new(options).unwrap();

    let failures = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&failures);
    let callback: FailureCallback = Arc::new(move |err: &(dyn std::error::Error + 'static)| {
        assert!(err.to_string().contains("500"));
        seen.fetch_add(1, Ordering::SeqCst);
    });
    client.set_failure_callback(Some(callback));

    let report = ErrorReport {
        timestamp: Utc::now(),
        logger: "app".to_string(),
        level: ErrorLevel::Error,
        payload: ReportPayload::Message {
            message: "boom".to_string(),
        },
        properties: PropertyDestination::None,
    };

    // Acknowledged on enqueue; the failure surfaces later through the callback.
    assert!(client.capture(&report).unwrap().is_some());
    client.flush().await.unwrap();
    mock.assert_async().await;
    assert_eq!(failures.load(Ordering::SeqCst), 1);

    client.set_failure_callback(None);
    assert!(client.capture(&report).unwrap().is_some());
    client.flush().await.unwrap();
    assert_eq!(failures.load(Ordering::SeqCst), 1);
}
