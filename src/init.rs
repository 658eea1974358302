use crate::layer::ForwardLayer;
use crate::router::Forwarder;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Subscriber settings for [`init_forwarding_with_config`].
///
/// **Fields**
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   added next to the [`ForwardLayer`] so events (including the
///   forwarder's own diagnostics) are also printed to the console.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self { enable_stdout: true }
    }
}

/// Error returned when a global subscriber is already installed.
#[derive(thiserror::Error, Debug)]
#[error("a global tracing subscriber is already installed")]
pub struct InitError(#[from] tracing::subscriber::SetGlobalDefaultError);

/// Install a global `tracing` subscriber that forwards every event through
/// `forwarder`.
///
/// **Parameters**
/// - `forwarder`: the [`Forwarder`] events are handed to; keep a clone to
///   call [`Forwarder::flush`] and [`Forwarder::close`] at shutdown.
/// - `config`: [`LayerConfig`] controlling console output.
///
/// **Effects**
///
/// Installs a [`Registry`] combined with [`ForwardLayer`] as the global
/// default subscriber, so all `tracing` events in the process are
/// observed by the forwarder.
pub fn init_forwarding_with_config(forwarder: Arc<Forwarder>, config: LayerConfig) -> Result<(), InitError> {
    let layer = ForwardLayer::new(forwarder);

    // The two branches build differently typed subscribers.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

/// Initialize forwarding with [`LayerConfig::default`].
pub fn init_forwarding(forwarder: Arc<Forwarder>) -> Result<(), InitError> {
    init_forwarding_with_config(forwarder, LayerConfig::default())
}
