use crate::dsn::{parse_dsn, Dsn};
use crate::error::ConfigError;
use crate::layout::Layout;
use crate::level::Severity;
use crate::version::VersionPolicy;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ENVIRONMENT: &str = "develop";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_NAME: &str = "error-forwarder";

/// What the forwarder does with a failure after recording it locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Return the error to the caller.
    #[default]
    Propagate,
    /// Report the event as undelivered and carry on.
    Swallow,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" | "rethrow" => Ok(FailurePolicy::Propagate),
            "swallow" | "ignore" => Ok(FailurePolicy::Swallow),
            _ => Err(ConfigError::FailurePolicy(s.to_string())),
        }
    }
}

/// Validated forwarder configuration. Immutable once handed to a
/// [`Forwarder`](crate::router::Forwarder).
#[derive(Debug, Clone)]
pub struct ForwarderConfig {
    /// Name used in diagnostics.
    pub name: String,
    pub endpoint: Dsn,
    /// Events below this level become trail entries instead of reports.
    pub minimum_report_level: Severity,
    pub ignore_events_without_failure: bool,
    /// Send properties as tags instead of extras.
    pub send_properties_as_tags: bool,
    pub environment: Option<String>,
    pub timeout: Option<Duration>,
    pub version_policy: VersionPolicy,
    /// Explicit release; skips version resolution when set.
    pub release: Option<String>,
    pub layout: Layout,
    pub failure_policy: FailurePolicy,
}

impl ForwarderConfig {
    pub fn new(endpoint: Dsn) -> Self {
        ForwarderConfig {
            name: DEFAULT_NAME.to_string(),
            endpoint,
            minimum_report_level: Severity::Trace,
            ignore_events_without_failure: false,
            send_properties_as_tags: false,
            environment: None,
            timeout: None,
            version_policy: VersionPolicy::default(),
            release: None,
            layout: Layout::default(),
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Parse `endpoint` and build a configuration with defaults.
    pub fn from_endpoint(endpoint: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(parse_dsn(endpoint)?))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_minimum_report_level(mut self, level: Severity) -> Self {
        self.minimum_report_level = level;
        self
    }

    pub fn with_ignore_events_without_failure(mut self, ignore: bool) -> Self {
        self.ignore_events_without_failure = ignore;
        self
    }

    pub fn with_properties_as_tags(mut self, as_tags: bool) -> Self {
        self.send_properties_as_tags = as_tags;
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_version_policy(mut self, policy: VersionPolicy) -> Self {
        self.version_policy = policy;
        self
    }

    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Environment label, `"develop"` when unset or blank.
    pub fn resolved_environment(&self) -> &str {
        match self.environment.as_deref().map(str::trim) {
            Some(env) if !env.is_empty() => env,
            _ => DEFAULT_ENVIRONMENT,
        }
    }

    /// Client timeout, ten seconds when unset or zero.
    pub fn resolved_timeout(&self) -> Duration {
        match self.timeout {
            Some(timeout) if !timeout.is_zero() => timeout,
            _ => DEFAULT_TIMEOUT,
        }
    }
}

/// String-valued registration surface, e.g. deserialized from a host's
/// configuration file or read from the environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ForwarderSettings {
    pub name: Option<String>,
    pub endpoint: Option<String>,
    pub minimum_report_level: Option<String>,
    pub ignore_events_without_failure: Option<bool>,
    pub send_properties_as_tags: Option<bool>,
    pub environment: Option<String>,
    pub timeout: Option<String>,
    pub version_policy: Option<String>,
    pub release: Option<String>,
    pub layout: Option<String>,
    pub failure_policy: Option<String>,
}

impl TryFrom<ForwarderSettings> for ForwarderConfig {
    type Error = ConfigError;

    fn try_from(settings: ForwarderSettings) -> Result<Self, Self::Error> {
        let endpoint = settings.endpoint.ok_or(ConfigError::MissingEndpoint)?;
        let mut config = ForwarderConfig::from_endpoint(&endpoint)?;

        if let Some(name) = settings.name.filter(|n| !n.trim().is_empty()) {
            config.name = name;
        }
        if let Some(level) = settings.minimum_report_level {
            config.minimum_report_level = level.parse::<Severity>()?;
        }
        if let Some(ignore) = settings.ignore_events_without_failure {
            config.ignore_events_without_failure = ignore;
        }
        if let Some(as_tags) = settings.send_properties_as_tags {
            config.send_properties_as_tags = as_tags;
        }
        config.environment = settings.environment;
        if let Some(timeout) = settings.timeout.filter(|t| !t.trim().is_empty()) {
            config.timeout = Some(parse_timeout(&timeout)?);
        }
        if let Some(policy) = settings.version_policy {
            config.version_policy = policy.parse::<VersionPolicy>()?;
        }
        config.release = settings.release.filter(|r| !r.trim().is_empty());
        if let Some(layout) = settings.layout {
            config.layout = layout.parse::<Layout>()?;
        }
        if let Some(policy) = settings.failure_policy {
            config.failure_policy = policy.parse::<FailurePolicy>()?;
        }

        Ok(config)
    }
}

/// Parse a timeout given either as seconds (`"10"`, `"2.5"`) or as
/// `hh:mm:ss[.fff]`.
pub fn parse_timeout(text: &str) -> Result<Duration, ConfigError> {
    let text = text.trim();
    let invalid = || ConfigError::Timeout(text.to_string());

    let seconds = if text.contains(':') {
        let parts: Vec<&str> = text.split(':').collect();
        let [hours, minutes, seconds] = parts.as_slice() else {
            return Err(invalid());
        };
        let hours: u64 = hours.parse().map_err(|_| invalid())?;
        let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
        let seconds: f64 = seconds.parse().map_err(|_| invalid())?;
        if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
            return Err(invalid());
        }
        let whole = hours
            .checked_mul(3600)
            .and_then(|h| h.checked_add(minutes * 60))
            .ok_or_else(invalid)?;
        whole as f64 + seconds
    } else {
        text.parse::<f64>().map_err(|_| invalid())?
    };

    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
}
