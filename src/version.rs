//! Release identification for the hosting process.
//!
//! The root module is discovered once per process by running an ordered
//! list of probes. Each probe is a plain `fn() -> Option<ModuleInfo>` so a
//! missing piece of host information simply ends that probe.

use once_cell::sync::{Lazy, OnceCell};
use std::path::Path;
use std::str::FromStr;

/// Version descriptors of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    pub version: Option<String>,
    pub file_version: Option<String>,
    pub informational_version: Option<String>,
}

impl ModuleInfo {
    /// Module whose version, file version and informational version are all
    /// the same string.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let version = version.into();
        ModuleInfo {
            name: name.into(),
            version: Some(version.clone()),
            file_version: Some(version.clone()),
            informational_version: Some(version),
        }
    }
}

/// Describe the calling crate as a [`ModuleInfo`], using its Cargo package
/// metadata captured at compile time.
///
/// Usually passed to [`register_entry_module`] from `main`.
#[macro_export]
macro_rules! entry_module {
    () => {
        $crate::version::ModuleInfo::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    };
}

/// Which version descriptor of the root module becomes the release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    #[default]
    AssemblyVersion,
    FileVersion,
    InformationalVersion,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown version policy `{0}`")]
pub struct ParseVersionPolicyError(pub String);

impl FromStr for VersionPolicy {
    type Err = ParseVersionPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assemblyversion" | "assembly-version" | "version" => Ok(VersionPolicy::AssemblyVersion),
            "fileversion" | "file-version" | "assemblyfileversion" => Ok(VersionPolicy::FileVersion),
            "informationalversion" | "informational-version" | "assemblyinformationalversion" => {
                Ok(VersionPolicy::InformationalVersion)
            }
            _ => Err(ParseVersionPolicyError(s.to_string())),
        }
    }
}

/// Pick the descriptor selected by `policy`. Absent module or descriptor
/// yields `None`.
pub fn resolve(root: Option<&ModuleInfo>, policy: VersionPolicy) -> Option<String> {
    let root = root?;
    match policy {
        VersionPolicy::AssemblyVersion => root.version.clone(),
        VersionPolicy::FileVersion => root.file_version.clone(),
        VersionPolicy::InformationalVersion => root.informational_version.clone(),
    }
}

/// A single root-module discovery strategy.
pub type ModuleProbe = fn() -> Option<ModuleInfo>;

/// Probes run by [`root_module`], in order.
pub const DEFAULT_PROBES: &[ModuleProbe] = &[entry_module_probe, hosting_context_probe];

static ENTRY_MODULE: OnceCell<ModuleInfo> = OnceCell::new();

static ROOT_MODULE: Lazy<Option<ModuleInfo>> = Lazy::new(|| discover_root_module_with(DEFAULT_PROBES));

/// Register the process's entry module. Only the first registration is
/// kept, and it only has an effect if made before the first call to
/// [`root_module`]. Returns `false` if a module was already registered.
pub fn register_entry_module(module: ModuleInfo) -> bool {
    ENTRY_MODULE.set(module).is_ok()
}

/// Root module of the process, discovered once and cached.
pub fn root_module() -> Option<&'static ModuleInfo> {
    ROOT_MODULE.as_ref()
}

/// Run `probes` in order and return the first module found.
pub fn discover_root_module_with(probes: &[ModuleProbe]) -> Option<ModuleInfo> {
    probes.iter().find_map(|probe| probe())
}

fn entry_module_probe() -> Option<ModuleInfo> {
    ENTRY_MODULE.get().cloned()
}

/// Hosted fallback: the hosting executable names the module and the host
/// launcher's exported package version supplies the version.
///
/// Only `cargo run` and `cargo test` export `CARGO_PKG_VERSION` to the
/// process, so a deployed binary finds nothing here. Binaries that want a
/// release in production must call [`register_entry_module`].
fn hosting_context_probe() -> Option<ModuleInfo> {
    let exe = std::env::current_exe().ok()?;
    let name = module_name(&exe)?;
    let version = std::env::var("CARGO_PKG_VERSION").ok().filter(|v| !v.trim().is_empty())?;
    Some(ModuleInfo::new(name, version))
}

fn module_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    (!stem.is_empty()).then(|| stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModuleInfo {
        ModuleInfo {
            name: "host".into(),
            version: Some("1.3.7".into()),
            file_version: Some("1.3.7.42".into()),
            informational_version: Some("1.3.7-beta+abc".into()),
        }
    }

    fn missing() -> Option<ModuleInfo> {
        None
    }

    fn found() -> Option<ModuleInfo> {
        Some(ModuleInfo::new("found", "2.0.0"))
    }

    fn never_reached() -> Option<ModuleInfo> {
        Some(ModuleInfo::new("late", "9.9.9"))
    }

    #[test]
    fn resolve_picks_descriptor_by_policy() {
        let root = sample();
        assert_eq!(resolve(Some(&root), VersionPolicy::AssemblyVersion).as_deref(), Some("1.3.7"));
        assert_eq!(resolve(Some(&root), VersionPolicy::FileVersion).as_deref(), Some("1.3.7.42"));
        assert_eq!(
            resolve(Some(&root), VersionPolicy::InformationalVersion).as_deref(),
            Some("1.3.7-beta+abc")
        );
    }

    #[test]
    fn resolve_without_root_is_absent_for_every_policy() {
        for policy in [
            VersionPolicy::AssemblyVersion,
            VersionPolicy::FileVersion,
            VersionPolicy::InformationalVersion,
        ] {
            assert_eq!(resolve(None, policy), None);
        }
    }

    #[test]
    fn missing_descriptor_is_absent() {
        let root = ModuleInfo { file_version: None, ..sample() };
        assert_eq!(resolve(Some(&root), VersionPolicy::FileVersion), None);
    }

    #[test]
    fn probes_run_in_order_until_one_succeeds() {
        let probes: &[ModuleProbe] = &[missing, found, never_reached];
        assert_eq!(discover_root_module_with(probes).map(|m| m.name), Some("found".to_string()));
        assert_eq!(discover_root_module_with(&[missing, missing]), None);
        assert_eq!(discover_root_module_with(&[]), None);
    }

    #[test]
    fn module_name_uses_file_stem() {
        assert_eq!(module_name(Path::new("/usr/bin/service.exe")).as_deref(), Some("service"));
        assert_eq!(module_name(Path::new("/")), None);
    }

    // Sole reader and writer of CARGO_PKG_VERSION at runtime in this binary.
    #[test]
    fn hosting_probe_needs_exported_package_version() {
        let saved = std::env::var("CARGO_PKG_VERSION").ok();

        std::env::set_var("CARGO_PKG_VERSION", "3.1.4");
        let hosted = hosting_context_probe();
        std::env::remove_var("CARGO_PKG_VERSION");
        let bare = hosting_context_probe();
        if let Some(version) = saved {
            std::env::set_var("CARGO_PKG_VERSION", version);
        }

        let hosted = hosted.unwrap();
        assert_eq!(hosted.version.as_deref(), Some("3.1.4"));
        assert_eq!(Some(hosted.name), std::env::current_exe().ok().as_deref().and_then(module_name));
        assert_eq!(bare, None);
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("FileVersion".parse::<VersionPolicy>(), Ok(VersionPolicy::FileVersion));
        assert_eq!("AssemblyFileVersion".parse::<VersionPolicy>(), Ok(VersionPolicy::FileVersion));
        assert_eq!("assembly-version".parse::<VersionPolicy>(), Ok(VersionPolicy::AssemblyVersion));
        assert_eq!(
            "AssemblyInformationalVersion".parse::<VersionPolicy>(),
            Ok(VersionPolicy::InformationalVersion)
        );
        assert!("nightly".parse::<VersionPolicy>().is_err());
    }

    #[test]
    fn entry_macro_describes_this_crate() {
        let module = crate::entry_module!();
        assert_eq!(module.name, "tracing-error-forwarder");
        assert_eq!(module.version.as_deref(), Some(env!("CARGO_PKG_VERSION")));
    }
}
