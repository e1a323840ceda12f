//! Enumeration of installed frameworks and SDKs across install hives.
//!
//! A hive is one prioritized install root. Frameworks live under
//! `<root>/shared/<name>/<version>/`, SDKs under `<root>/sdk/<version>/`.
//! A version directory only counts if it contains its marker file; anything
//! whose name does not parse as a version is skipped silently, since doc
//! folders and stray files are common next to real installs.
//!
//! The result ordering is a documented invariant: frameworks sort by
//! `(name asc, version asc, hive_depth desc)`, SDKs by
//! `(version asc, hive_depth desc)`. The descending hive-depth tie-break
//! means that among equal versions the farther hive sorts first, so callers
//! that prefer the nearest hive on a version tie must walk the list from
//! the end. The matcher loop does exactly that.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::version::FxVersion;

/// Marker file gating an SDK version directory.
pub const SDK_MARKER: &str = "dotnet.dll";

/// Marker file gating a framework version directory.
pub fn framework_marker(name: &str) -> String {
    format!("{name}.deps.json")
}

/// One installed framework or SDK version found on disk.
///
/// Recomputed on every query; the filesystem is the source of truth and
/// nothing here is cached across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledComponent {
    /// Framework name; `None` for SDKs.
    pub name: Option<String>,
    pub version: FxVersion,
    /// Directory holding the version subdirectories (`.../shared/<name>`
    /// or `.../sdk`). The component itself lives at
    /// `root_dir/<version>`.
    pub root_dir: PathBuf,
    /// Index of the originating root in the hive list; 0 is nearest.
    pub hive_depth: u32,
}

impl InstalledComponent {
    /// Full path of this component's version directory.
    pub fn dir(&self) -> PathBuf {
        self.root_dir.join(self.version.to_string())
    }
}

/// Enumerate installed frameworks, optionally constrained to one name.
pub fn scan_frameworks(roots: &[PathBuf], want_name: Option<&str>) -> Vec<InstalledComponent> {
    let mut found = Vec::new();
    for (depth, root) in roots.iter().enumerate() {
        let shared = root.join("shared");
        let names: Vec<String> = match want_name {
            Some(name) => vec![name.to_string()],
            None => subdirectory_names(&shared),
        };
        for name in names {
            let fx_root = shared.join(&name);
            let marker = framework_marker(&name);
            for version in version_subdirectories(&fx_root, &marker) {
                found.push(InstalledComponent {
                    name: Some(name.clone()),
                    version,
                    root_dir: fx_root.clone(),
                    hive_depth: depth as u32,
                });
            }
        }
    }
    found.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.version.cmp(&b.version))
            .then_with(|| b.hive_depth.cmp(&a.hive_depth))
    });
    found
}

/// Enumerate installed SDKs across the hive list.
pub fn scan_sdks(roots: &[PathBuf]) -> Vec<InstalledComponent> {
    let mut found = Vec::new();
    for (depth, root) in roots.iter().enumerate() {
        let sdk_root = root.join("sdk");
        for version in version_subdirectories(&sdk_root, SDK_MARKER) {
            found.push(InstalledComponent {
                name: None,
                version,
                root_dir: sdk_root.clone(),
                hive_depth: depth as u32,
            });
        }
    }
    found.sort_by(|a, b| {
        a.version
            .cmp(&b.version)
            .then_with(|| b.hive_depth.cmp(&a.hive_depth))
    });
    found
}

/// Build the prioritized hive list: the nearest root first, then the
/// machine-global location when multi-level lookup is enabled. The toggle
/// itself (env/registry) is the caller's concern.
pub fn default_hives(dotnet_root: &Path, multilevel: bool) -> Vec<PathBuf> {
    let mut hives = vec![dotnet_root.to_path_buf()];
    if multilevel {
        let global = global_install_location();
        if global != dotnet_root {
            hives.push(global);
        }
    }
    hives
}

fn global_install_location() -> PathBuf {
    #[cfg(windows)]
    {
        let programs = std::env::var_os("ProgramFiles")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"));
        programs.join("dotnet")
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/usr/share/dotnet")
    }
}

fn subdirectory_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

/// List the version-named subdirectories of `dir` that carry `marker`.
fn version_subdirectories(dir: &Path, marker: &str) -> Vec<FxVersion> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut versions = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let Ok(version) = FxVersion::parse(&name) else {
            debug!(dir = %dir.display(), entry = %name, "skipping non-version directory");
            continue;
        };
        if !path.join(marker).is_file() {
            debug!(dir = %path.display(), marker, "skipping version directory without marker");
            continue;
        }
        versions.push(version);
    }
    versions
}
