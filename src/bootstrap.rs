use crate::client::{CaptureClient, ClientFactory, ClientOptions};
use crate::config::ForwarderConfig;
use crate::diagnostics;
use crate::dsn::Dsn;
use crate::error::ForwardError;
use crate::version::{self, VersionPolicy};
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Lazily constructs the capture client exactly once.
///
/// Concurrent first callers block until the single construction finishes
/// and all observe the same handle. A failed construction is not cached, so
/// the next call tries again.
pub struct ClientBootstrap {
    adapter: Arc<str>,
    dsn: Dsn,
    timeout: Duration,
    environment: String,
    release: Option<String>,
    version_policy: VersionPolicy,
    factory: Box<dyn ClientFactory>,
    client: OnceCell<Arc<dyn CaptureClient>>,
    constructions: AtomicUsize,
}

impl ClientBootstrap {
    pub fn new(config: &ForwarderConfig, factory: Box<dyn ClientFactory>) -> Self {
        ClientBootstrap {
            adapter: Arc::from(config.name.as_str()),
            dsn: config.endpoint.clone(),
            timeout: config.resolved_timeout(),
            environment: config.resolved_environment().to_string(),
            release: config.release.clone(),
            version_policy: config.version_policy,
            factory,
            client: OnceCell::new(),
            constructions: AtomicUsize::new(0),
        }
    }

    /// Shared client handle, constructing it on first use.
    pub fn client(&self) -> Result<&Arc<dyn CaptureClient>, ForwardError> {
        self.client.get_or_try_init(|| self.construct())
    }

    /// Options for the client. Without an explicit release this resolves
    /// it from the root module, which runs root-module discovery the first
    /// time anything in the process asks for it.
    pub fn client_options(&self) -> ClientOptions {
        let release = self
            .release
            .clone()
            .or_else(|| version::resolve(version::root_module(), self.version_policy));

        ClientOptions {
            dsn: self.dsn.clone(),
            timeout: self.timeout,
            environment: self.environment.clone(),
            release,
        }
    }

    fn construct(&self) -> Result<Arc<dyn CaptureClient>, ForwardError> {
        let options = self.client_options();
        let release = options.release.clone();
        let client = self
            .factory
            .create(options)
            .map_err(ForwardError::ClientConstruction)?;
        self.constructions.fetch_add(1, Ordering::Relaxed);

        client.set_failure_callback(Some(diagnostics::failure_callback(Arc::clone(&self.adapter))));
        diagnostics::record_client_constructed(&self.adapter, release.as_deref(), &self.environment);
        Ok(client)
    }

    /// Handle if it has been constructed, without constructing it.
    pub fn get(&self) -> Option<&Arc<dyn CaptureClient>> {
        self.client.get()
    }

    pub fn is_constructed(&self) -> bool {
        self.client.get().is_some()
    }

    /// Number of successful constructions; never more than one.
    pub fn construction_count(&self) -> usize {
        self.constructions.load(Ordering::Relaxed)
    }

    /// Clear the client's failure callback so it no longer refers back to
    /// this adapter. Safe to call more than once.
    pub fn teardown(&self) {
        if let Some(client) = self.client.get() {
            client.set_failure_callback(None);
        }
    }
}

impl Drop for ClientBootstrap {
    fn drop(&mut self) {
        self.teardown();
    }
}
