//! `global.json` discovery and `sdk` object parsing.
//!
//! The file is found by walking the working directory and its ancestors.
//! Parsing is all-or-nothing: if any present key has the wrong type, the
//! roll-forward name is unknown, a non-`latestMajor` policy appears
//! without a version, or `allowPrerelease: false` is combined with a
//! prerelease version, the entire file is discarded and the caller falls
//! back to an unconstrained resolver. Partial application of a malformed
//! file is never permitted.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::rollforward::RollForwardPolicy;
use crate::version::FxVersion;

pub const GLOBAL_FILE_NAME: &str = "global.json";

/// Placeholder in `sdk.paths` meaning "substitute the dotnet root".
pub const HOST_PATH_PLACEHOLDER: &str = "$host$";

/// The parsed `sdk` object of a `global.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SdkSettings {
    pub version: Option<FxVersion>,
    pub roll_forward: Option<RollForwardPolicy>,
    pub allow_prerelease: Option<bool>,
    pub paths: Option<Vec<String>>,
    pub error_message: Option<String>,
}

/// Walk `cwd` and its ancestors for the nearest `global.json`.
pub fn find_nearest(cwd: &Path) -> Option<PathBuf> {
    cwd.ancestors()
        .map(|dir| dir.join(GLOBAL_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Parse the `sdk` object of the file at `path`.
///
/// `Ok(None)` means the file has no `sdk` object (a valid file that
/// constrains nothing). `Err` carries the reason the file must be
/// discarded wholesale.
pub fn parse_sdk_settings(path: &Path) -> Result<Option<SdkSettings>, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("unreadable: {e}"))?;
    let doc: Value = serde_json::from_str(&text).map_err(|e| format!("not valid JSON: {e}"))?;
    let Some(sdk) = doc.get("sdk") else {
        return Ok(None);
    };
    let sdk = sdk.as_object().ok_or("sdk must be an object")?;

    let mut settings = SdkSettings::default();

    if let Some(value) = sdk.get("version") {
        let text = value.as_str().ok_or("sdk.version must be a string")?;
        let version =
            FxVersion::parse(text).map_err(|_| format!("sdk.version '{text}' is not a version"))?;
        settings.version = Some(version);
    }

    if let Some(value) = sdk.get("rollForward") {
        let text = value.as_str().ok_or("sdk.rollForward must be a string")?;
        let policy: RollForwardPolicy = text
            .parse()
            .map_err(|_| format!("sdk.rollForward '{text}' is not a policy"))?;
        settings.roll_forward = Some(policy);
    }

    if let Some(value) = sdk.get("allowPrerelease") {
        settings.allow_prerelease = Some(
            value
                .as_bool()
                .ok_or("sdk.allowPrerelease must be a boolean")?,
        );
    }

    if let Some(value) = sdk.get("paths") {
        let list = value.as_array().ok_or("sdk.paths must be an array")?;
        let mut paths = Vec::with_capacity(list.len());
        for entry in list {
            let text = entry.as_str().ok_or("sdk.paths entries must be strings")?;
            paths.push(text.to_string());
        }
        settings.paths = Some(paths);
    }

    if let Some(value) = sdk.get("errorMessage") {
        let text = value.as_str().ok_or("sdk.errorMessage must be a string")?;
        settings.error_message = Some(text.to_string());
    }

    // Cross-field constraints.
    if let Some(policy) = settings.roll_forward
        && policy != RollForwardPolicy::LatestMajor
        && settings.version.is_none()
    {
        return Err(format!("sdk.rollForward '{policy}' requires sdk.version"));
    }
    if settings.allow_prerelease == Some(false)
        && settings.version.as_ref().is_some_and(FxVersion::is_prerelease)
    {
        return Err("sdk.version is a prerelease but allowPrerelease is false".to_string());
    }

    Ok(Some(settings))
}
