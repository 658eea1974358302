use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use tracing_error_forwarder::init::{init_forwarding_with_config, LayerConfig};
use tracing_error_forwarder::noop_client::NoopClient;
use tracing_error_forwarder::{Forwarder, ForwarderConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ForwarderConfig::from_endpoint("http://public@localhost/1")?;
    let forwarder = Arc::new(Forwarder::with_client(config, Arc::new(NoopClient)));
    init_forwarding_with_config(forwarder, LayerConfig { enable_stdout: false })?;

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        error!(iteration = i, "default load test error");
    }

    let elapsed = start.elapsed();
    println!("default config: forwarded {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
