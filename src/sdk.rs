//! SDK resolution for a working directory, honoring `global.json`.
//!
//! Resolution order: the `sdk.paths` roots from `global.json` when present
//! (with `$host$` substituted by the dotnet root), otherwise the dotnet
//! root alone. Roots are consulted one at a time and the first root that
//! yields any match wins, even if a later root holds a newer version.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::global::{self, HOST_PATH_PLACEHOLDER, SdkSettings};
use crate::install::{self, SDK_MARKER};
use crate::rollforward::{self, RollForwardPolicy, VersionKind};
use crate::status::HostError;
use crate::version::FxVersion;

/// Resolves the SDK directory to dispatch to.
#[derive(Debug, Clone)]
pub struct SdkResolver {
    requested: Option<FxVersion>,
    policy: RollForwardPolicy,
    allow_prerelease: bool,
    paths: Option<Vec<String>>,
    error_message: Option<String>,
    global_file: Option<PathBuf>,
}

impl Default for SdkResolver {
    /// The unconstrained resolver: any version, newest installed wins.
    fn default() -> Self {
        Self {
            requested: None,
            policy: RollForwardPolicy::LatestMajor,
            allow_prerelease: true,
            paths: None,
            error_message: None,
            global_file: None,
        }
    }
}

impl SdkResolver {
    /// Build a resolver from the nearest `global.json` above `cwd`.
    /// No file, or a file that must be discarded, yields the default.
    pub fn from_nearest_global_file(cwd: &Path) -> Self {
        match global::find_nearest(cwd) {
            Some(path) => Self::from_global_file(&path),
            None => Self::default(),
        }
    }

    /// Build a resolver from a specific `global.json`.
    pub fn from_global_file(path: &Path) -> Self {
        match global::parse_sdk_settings(path) {
            Ok(Some(settings)) => Self::from_settings(settings, path),
            Ok(None) => Self {
                global_file: Some(path.to_path_buf()),
                ..Self::default()
            },
            Err(reason) => {
                // All-or-nothing: a malformed file constrains nothing.
                warn!(file = %path.display(), reason, "ignoring malformed global.json");
                Self::default()
            }
        }
    }

    fn from_settings(settings: SdkSettings, path: &Path) -> Self {
        let policy = settings.roll_forward.unwrap_or(if settings.version.is_some() {
            RollForwardPolicy::Patch
        } else {
            RollForwardPolicy::LatestMajor
        });
        // A prerelease request always admits prereleases.
        let allow_prerelease = settings.allow_prerelease.unwrap_or(true)
            || settings.version.as_ref().is_some_and(FxVersion::is_prerelease);
        Self {
            requested: settings.version,
            policy,
            allow_prerelease,
            paths: settings.paths,
            error_message: settings.error_message,
            global_file: Some(path.to_path_buf()),
        }
    }

    pub fn requested_version(&self) -> Option<&FxVersion> {
        self.requested.as_ref()
    }

    pub fn policy(&self) -> RollForwardPolicy {
        self.policy
    }

    pub fn allow_prerelease(&self) -> bool {
        self.allow_prerelease
    }

    pub fn global_file(&self) -> Option<&Path> {
        self.global_file.as_deref()
    }

    /// The ordered candidate install roots (without the `sdk` suffix).
    fn candidate_roots(&self, dotnet_root: &Path) -> Vec<PathBuf> {
        match &self.paths {
            Some(paths) => paths
                .iter()
                .map(|p| {
                    if p == HOST_PATH_PLACEHOLDER {
                        dotnet_root.to_path_buf()
                    } else {
                        PathBuf::from(p)
                    }
                })
                .collect(),
            None => vec![dotnet_root.to_path_buf()],
        }
    }

    /// Resolve the SDK version directory. First root that yields any match
    /// wins; later roots are never consulted after that.
    pub fn resolve(&self, dotnet_root: &Path) -> Option<PathBuf> {
        for root in self.candidate_roots(dotnet_root) {
            let sdk_dir = root.join("sdk");
            if !sdk_dir.is_dir() {
                continue;
            }

            // Fast path: probe the literal requested directory. The scan
            // loop prefers the exact version for these policies, so the
            // outcome is the same either way.
            if self.policy.exact_match_preferred()
                && let Some(requested) = &self.requested
            {
                let probe = sdk_dir.join(requested.to_string());
                if probe.join(SDK_MARKER).is_file() {
                    debug!(dir = %probe.display(), "exact SDK match");
                    return Some(probe);
                }
            }

            let installed = install::scan_sdks(std::slice::from_ref(&root));
            if let Some(best) = rollforward::resolve_best(
                &installed,
                self.requested.as_ref(),
                self.policy,
                self.allow_prerelease,
                VersionKind::Sdk,
            ) {
                debug!(version = %best.version, root = %root.display(), "resolved SDK");
                return Some(best.dir());
            }
        }
        None
    }

    /// Resolve, or build the full diagnostic enumerating every installed
    /// SDK so the caller can render "requested X, found Y, Z, W".
    pub fn resolve_or_error(&self, dotnet_root: &Path) -> Result<PathBuf, HostError> {
        if let Some(dir) = self.resolve(dotnet_root) {
            return Ok(dir);
        }
        let roots = self.candidate_roots(dotnet_root);
        let installed = install::scan_sdks(&roots)
            .into_iter()
            .map(|c| format!("{} [{}]", c.version, c.root_dir.display()))
            .collect();
        let mut requested = match &self.requested {
            Some(version) => format!("{version} ({})", self.policy),
            None => format!("any version ({})", self.policy),
        };
        if let Some(file) = &self.global_file {
            requested.push_str(&format!(" per {}", file.display()));
        }
        Err(HostError::SdkNotFound {
            requested,
            search_roots: roots.into_iter().map(|r| r.join("sdk")).collect(),
            installed,
            message: self.error_message.clone(),
        })
    }
}
