use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

use tracing_error_forwarder::init::{init_forwarding_with_config, LayerConfig};
use tracing_error_forwarder::layout::Layout;
use tracing_error_forwarder::noop_client::NoopClient;
use tracing_error_forwarder::{Forwarder, ForwarderConfig, Severity};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ForwarderConfig::from_endpoint("http://public@localhost/1")?
        .with_minimum_report_level(Severity::Error)
        .with_properties_as_tags(true)
        .with_layout(Layout::parse("${level}|${logger}|${message}")?);
    let forwarder = Arc::new(Forwarder::with_client(config, Arc::new(NoopClient)));
    init_forwarding_with_config(forwarder, LayerConfig { enable_stdout: false })?;

    let n: u64 = 100_000;
    let start = Instant::now();

    // Half the events become breadcrumbs, half become reports.
    for i in 0..n {
        if i % 2 == 0 {
            debug!(iteration = i, "custom load test breadcrumb");
        } else {
            error!(iteration = i, "custom load test error");
        }
    }

    let elapsed = start.elapsed();
    println!("custom config: forwarded {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
