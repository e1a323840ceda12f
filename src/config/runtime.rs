//! Runtime config documents (`*.runtimeconfig.json`).
//!
//! The document declares which shared frameworks an app (or another
//! framework) depends on, plus config properties and probe paths. Configs
//! are re-read from disk on every resolution pass; nothing is cached.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::rollforward::RollForwardPolicy;
use crate::status::HostError;
use crate::version::FxVersion;

/// Default policy for a framework reference that does not state one.
pub const DEFAULT_FRAMEWORK_POLICY: RollForwardPolicy = RollForwardPolicy::Minor;

/// A named, versioned, policy-qualified dependency on a shared framework.
///
/// Never mutated after parse; reconciliation produces new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkReference {
    pub name: String,
    pub version: FxVersion,
    pub roll_forward: RollForwardPolicy,
    pub allow_prerelease: bool,
}

impl FrameworkReference {
    pub fn new(name: &str, version: FxVersion, roll_forward: RollForwardPolicy) -> Self {
        let allow_prerelease = version.is_prerelease();
        Self {
            name: name.to_string(),
            version,
            roll_forward,
            allow_prerelease,
        }
    }

    /// Render as `name version (policy)` for diagnostics.
    pub fn describe(&self) -> String {
        format!("{} {} ({})", self.name, self.version, self.roll_forward)
    }
}

/// A parsed runtime config document.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub path: PathBuf,
    pub tfm: Option<String>,
    frameworks: Vec<FrameworkReference>,
    included_frameworks: Vec<FrameworkReference>,
    properties: BTreeMap<String, String>,
    probe_paths: Vec<PathBuf>,
}

impl RuntimeConfig {
    /// Parse the config at `path`. A transient read error surfaces
    /// immediately as a resolution failure; there is no retry.
    pub fn from_file(path: &Path) -> Result<Self, HostError> {
        let text = std::fs::read_to_string(path).map_err(|e| HostError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_str_at(&text, path)
    }

    /// Config for the framework named `name` installed at `dir`. A missing
    /// file is an empty config, not an error: leaf frameworks commonly
    /// ship without one.
    pub fn for_framework(dir: &Path, name: &str) -> Result<Self, HostError> {
        let path = dir.join(format!("{name}.runtimeconfig.json"));
        if !path.is_file() {
            return Ok(RuntimeConfig {
                path,
                ..RuntimeConfig::default()
            });
        }
        Self::from_file(&path)
    }

    /// Path of the config owned by the app at `app_path`
    /// (`<app>.runtimeconfig.json` next to it).
    pub fn path_for_app(app_path: &Path) -> PathBuf {
        let stem = app_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        app_path.with_file_name(format!("{stem}.runtimeconfig.json"))
    }

    fn from_str_at(text: &str, path: &Path) -> Result<Self, HostError> {
        let invalid = |reason: String| HostError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        };
        let doc: Value =
            serde_json::from_str(text).map_err(|e| invalid(format!("not valid JSON: {e}")))?;
        let options = doc.get("runtimeOptions").cloned().unwrap_or(Value::Null);

        let tfm = options
            .get("tfm")
            .and_then(Value::as_str)
            .map(str::to_string);

        let default_policy = match options.get("rollForward") {
            Some(Value::String(s)) => s
                .parse::<RollForwardPolicy>()
                .map_err(|_| invalid(format!("unknown rollForward value: {s}")))?,
            Some(other) => return Err(invalid(format!("rollForward must be a string, got {other}"))),
            None => DEFAULT_FRAMEWORK_POLICY,
        };

        let mut frameworks = Vec::new();
        if let Some(single) = options.get("framework") {
            frameworks.push(parse_framework(single, default_policy, path)?);
        }
        if let Some(list) = options.get("frameworks") {
            let list = list
                .as_array()
                .ok_or_else(|| invalid("frameworks must be an array".to_string()))?;
            for entry in list {
                frameworks.push(parse_framework(entry, default_policy, path)?);
            }
        }

        let mut included_frameworks = Vec::new();
        if let Some(list) = options.get("includedFrameworks") {
            let list = list
                .as_array()
                .ok_or_else(|| invalid("includedFrameworks must be an array".to_string()))?;
            for entry in list {
                included_frameworks.push(parse_framework(entry, default_policy, path)?);
            }
        }

        let mut properties = BTreeMap::new();
        if let Some(map) = options.get("configProperties").and_then(Value::as_object) {
            for (key, value) in map {
                properties.insert(key.clone(), stringify(value));
            }
        }

        let probe_paths = options
            .get("additionalProbingPaths")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(RuntimeConfig {
            path: path.to_path_buf(),
            tfm,
            frameworks,
            included_frameworks,
            properties,
            probe_paths,
        })
    }

    /// Framework-dependent configs name frameworks to resolve; a config
    /// listing included frameworks carries them inside the app instead.
    pub fn is_framework_dependent(&self) -> bool {
        !self.frameworks.is_empty() && self.included_frameworks.is_empty()
    }

    pub fn frameworks(&self) -> &[FrameworkReference] {
        &self.frameworks
    }

    pub fn included_frameworks(&self) -> &[FrameworkReference] {
        &self.included_frameworks
    }

    pub fn probe_paths(&self) -> &[PathBuf] {
        &self.probe_paths
    }

    /// Merge this config's properties into `target`. Existing keys keep
    /// their current value; the nearest config wins.
    pub fn combine_properties(&self, target: &mut BTreeMap<String, String>) {
        for (key, value) in &self.properties {
            target.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    #[cfg(test)]
    pub fn from_json_str(text: &str, path: &Path) -> Result<Self, HostError> {
        Self::from_str_at(text, path)
    }
}

fn parse_framework(
    entry: &Value,
    default_policy: RollForwardPolicy,
    path: &Path,
) -> Result<FrameworkReference, HostError> {
    let invalid = |reason: String| HostError::InvalidConfig {
        path: path.to_path_buf(),
        reason,
    };
    let object = entry
        .as_object()
        .ok_or_else(|| invalid("framework reference must be an object".to_string()))?;
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("framework reference missing name".to_string()))?;
    let version_str = object
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(format!("framework '{name}' missing version")))?;
    let version = FxVersion::parse(version_str)
        .map_err(|_| invalid(format!("framework '{name}' has invalid version '{version_str}'")))?;
    let roll_forward = match object.get("rollForward") {
        Some(Value::String(s)) => s
            .parse::<RollForwardPolicy>()
            .map_err(|_| invalid(format!("framework '{name}' has unknown rollForward '{s}'")))?,
        Some(other) => {
            return Err(invalid(format!(
                "framework '{name}' rollForward must be a string, got {other}"
            )));
        }
        None => default_policy,
    };
    Ok(FrameworkReference::new(name, version, roll_forward))
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
