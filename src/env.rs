//! `ERROR_FORWARDER_*` variables, one per [`ForwarderSettings`] key.
//!
//! Blank variables count as unset. Only [`ForwarderSettings::from_env`]
//! reads the process environment.

use crate::config::ForwarderSettings;
use crate::error::ConfigError;

/// Adapter name used in diagnostics.
pub const ERROR_FORWARDER_NAME_ENV: &str = "ERROR_FORWARDER_NAME";

/// Backend endpoint, e.g. `https://public@errors.example.com/4`.
pub const ERROR_FORWARDER_DSN_ENV: &str = "ERROR_FORWARDER_DSN";

/// Minimum severity that becomes a report.
pub const ERROR_FORWARDER_MIN_LEVEL_ENV: &str = "ERROR_FORWARDER_MIN_LEVEL";

/// `true` to drop report-level events that carry no error.
pub const ERROR_FORWARDER_IGNORE_WITHOUT_FAILURE_ENV: &str = "ERROR_FORWARDER_IGNORE_WITHOUT_FAILURE";

/// `true` to send event properties as tags instead of extras.
pub const ERROR_FORWARDER_PROPERTIES_AS_TAGS_ENV: &str = "ERROR_FORWARDER_PROPERTIES_AS_TAGS";

/// Environment label attached to reports.
pub const ERROR_FORWARDER_ENVIRONMENT_ENV: &str = "ERROR_FORWARDER_ENVIRONMENT";

/// Client timeout, seconds or `hh:mm:ss`.
pub const ERROR_FORWARDER_TIMEOUT_ENV: &str = "ERROR_FORWARDER_TIMEOUT";

/// Which version of the root module becomes the release.
pub const ERROR_FORWARDER_VERSION_POLICY_ENV: &str = "ERROR_FORWARDER_VERSION_POLICY";

/// Explicit release, overriding version resolution.
pub const ERROR_FORWARDER_RELEASE_ENV: &str = "ERROR_FORWARDER_RELEASE";

/// Layout template for trail entries and message-only reports.
pub const ERROR_FORWARDER_LAYOUT_ENV: &str = "ERROR_FORWARDER_LAYOUT";

/// `propagate` or `swallow`.
pub const ERROR_FORWARDER_FAILURE_POLICY_ENV: &str = "ERROR_FORWARDER_FAILURE_POLICY";

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a boolean setting (`true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`).
pub fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Bool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

impl ForwarderSettings {
    /// Collect settings from `ERROR_FORWARDER_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let flag = |key: &str| env_opt(key).map(|v| parse_bool(key, &v)).transpose();

        Ok(ForwarderSettings {
            name: env_opt(ERROR_FORWARDER_NAME_ENV),
            endpoint: env_opt(ERROR_FORWARDER_DSN_ENV),
            minimum_report_level: env_opt(ERROR_FORWARDER_MIN_LEVEL_ENV),
            ignore_events_without_failure: flag(ERROR_FORWARDER_IGNORE_WITHOUT_FAILURE_ENV)?,
            send_properties_as_tags: flag(ERROR_FORWARDER_PROPERTIES_AS_TAGS_ENV)?,
            environment: env_opt(ERROR_FORWARDER_ENVIRONMENT_ENV),
            timeout: env_opt(ERROR_FORWARDER_TIMEOUT_ENV),
            version_policy: env_opt(ERROR_FORWARDER_VERSION_POLICY_ENV),
            release: env_opt(ERROR_FORWARDER_RELEASE_ENV),
            layout: env_opt(ERROR_FORWARDER_LAYOUT_ENV),
            failure_policy: env_opt(ERROR_FORWARDER_FAILURE_POLICY_ENV),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_booleans() {
        assert!(parse_bool("k", "TRUE").unwrap());
        assert!(parse_bool("k", "1").unwrap());
        assert!(!parse_bool("k", "off").unwrap());
        assert!(matches!(parse_bool("k", "maybe"), Err(ConfigError::Bool { .. })));
    }

    // The only test in this binary that touches these variables.
    #[test]
    fn from_env_reads_every_setting() {
        let vars = [
            (ERROR_FORWARDER_NAME_ENV, "checkout"),
            (ERROR_FORWARDER_DSN_ENV, "https://public@errors.example.com/4"),
            (ERROR_FORWARDER_MIN_LEVEL_ENV, "warn"),
            (ERROR_FORWARDER_IGNORE_WITHOUT_FAILURE_ENV, "yes"),
            (ERROR_FORWARDER_PROPERTIES_AS_TAGS_ENV, "0"),
            (ERROR_FORWARDER_ENVIRONMENT_ENV, "staging"),
            (ERROR_FORWARDER_TIMEOUT_ENV, "00:00:05"),
            (ERROR_FORWARDER_VERSION_POLICY_ENV, "FileVersion"),
            (ERROR_FORWARDER_RELEASE_ENV, "  "),
            (ERROR_FORWARDER_LAYOUT_ENV, "${level}: ${message}"),
            (ERROR_FORWARDER_FAILURE_POLICY_ENV, "swallow"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        let settings = ForwarderSettings::from_env();
        for (key, _) in vars {
            std::env::remove_var(key);
        }

        let settings = settings.unwrap();
        assert_eq!(settings.name.as_deref(), Some("checkout"));
        assert_eq!(settings.ignore_events_without_failure, Some(true));
        assert_eq!(settings.send_properties_as_tags, Some(false));
        assert_eq!(settings.release, None);
        assert_eq!(settings.layout.as_deref(), Some("${level}: ${message}"));

        let config = crate::config::ForwarderConfig::try_from(settings).unwrap();
        assert_eq!(config.name, "checkout");
        assert_eq!(config.minimum_report_level, crate::level::Severity::Warn);
        assert_eq!(config.resolved_timeout(), std::time::Duration::from_secs(5));
        assert_eq!(config.version_policy, crate::version::VersionPolicy::FileVersion);
        assert_eq!(config.failure_policy, crate::config::FailurePolicy::Swallow);
    }
}
