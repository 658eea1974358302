pub mod level;
pub mod event;
pub mod properties;
pub mod report;
pub mod dsn;
pub mod version;
pub mod layout;
pub mod error;
pub mod config;
pub mod env;
pub mod diagnostics;
pub mod client;
pub mod bootstrap;
pub mod router;
pub mod layer;

#[cfg(feature = "http")]
pub mod http;

pub mod init;
pub mod noop_client;

pub use client::{CaptureClient, ClientOptions};
pub use config::{FailurePolicy, ForwarderConfig, ForwarderSettings};
pub use error::{ConfigError, ForwardError};
pub use event::{Failure, LogEvent};
pub use level::Severity;
pub use router::{Forwarder, Outcome};
