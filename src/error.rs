use crate::client::BoxError;
use crate::dsn::DsnError;
use crate::layout::LayoutError;
use crate::level::ParseSeverityError;
use crate::version::ParseVersionPolicyError;

/// Error type returned when building a forwarder configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("endpoint is required")]
    MissingEndpoint,

    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] DsnError),

    #[error(transparent)]
    Level(#[from] ParseSeverityError),

    #[error(transparent)]
    VersionPolicy(#[from] ParseVersionPolicyError),

    #[error("invalid timeout `{0}`")]
    Timeout(String),

    #[error("invalid boolean `{value}` for `{key}`")]
    Bool { key: String, value: String },

    #[error("unknown failure policy `{0}`")]
    FailurePolicy(String),

    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
}

/// Error type returned when an event could not be forwarded.
#[derive(thiserror::Error, Debug)]
pub enum ForwardError {
    #[error("failed to construct capture client: {0}")]
    ClientConstruction(#[source] BoxError),

    #[error("failed to capture report: {0}")]
    Capture(#[source] BoxError),

    #[error("failed to append trail entry: {0}")]
    Trail(#[source] BoxError),

    #[error("client returned no acknowledgment for the report")]
    MissingAcknowledgment,
}
