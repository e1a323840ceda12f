//! End-to-end resolution tests over on-disk install layouts.
//!
//! Each test builds a throwaway hive (sdk/ and shared/ trees with marker
//! files) plus app configs, then drives the public resolution entry
//! points against it.

use std::path::{Path, PathBuf};

use hostfx::{
    FxVersion, RollForwardPolicy, RuntimeConfig, SdkResolver, StatusCode,
    resolve_frameworks_for_app,
};
use tempfile::TempDir;

/// Lay down `<hive>/shared/<name>/<version>/` with its marker file.
fn write_framework(hive: &Path, name: &str, version: &str) -> PathBuf {
    let dir = hive.join("shared").join(name).join(version);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{name}.deps.json")), "{}").unwrap();
    dir
}

/// Lay down a framework whose own runtimeconfig declares more references.
fn write_framework_with_config(hive: &Path, name: &str, version: &str, config: &str) {
    let dir = write_framework(hive, name, version);
    std::fs::write(dir.join(format!("{name}.runtimeconfig.json")), config).unwrap();
}

fn write_sdk(hive: &Path, version: &str) {
    let dir = hive.join("sdk").join(version);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("dotnet.dll"), "").unwrap();
}

/// Write `<app_dir>/app.dll` and its runtimeconfig; returns the app path.
fn write_app(app_dir: &Path, config: &str) -> PathBuf {
    std::fs::create_dir_all(app_dir).unwrap();
    let app = app_dir.join("app.dll");
    std::fs::write(&app, "").unwrap();
    std::fs::write(app_dir.join("app.runtimeconfig.json"), config).unwrap();
    app
}

fn resolve(app: &Path, hives: &[PathBuf]) -> Result<Vec<hostfx::FxDefinition>, hostfx::HostError> {
    let config = RuntimeConfig::from_file(&RuntimeConfig::path_for_app(app))?;
    resolve_frameworks_for_app(app, config, hives, None)
}

fn found_versions(definitions: &[hostfx::FxDefinition]) -> Vec<(String, String)> {
    definitions
        .iter()
        .filter(|d| !d.found_version.is_empty())
        .map(|d| (d.name.clone(), d.found_version.to_string()))
        .collect()
}

// =============================================================================
// Framework resolution
// =============================================================================

#[test]
fn test_minor_rolls_to_closest_not_latest() {
    let hive = TempDir::new().unwrap();
    for v in ["3.1.0", "3.1.5", "3.9.0"] {
        write_framework(hive.path(), "Microsoft.NETCore.App", v);
    }
    let app_dir = TempDir::new().unwrap();
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"framework":
            {"name": "Microsoft.NETCore.App", "version": "3.1.0"}}}"#,
    );

    let definitions = resolve(&app, &[hive.path().to_path_buf()]).unwrap();
    assert_eq!(
        found_versions(&definitions),
        vec![("Microsoft.NETCore.App".to_string(), "3.1.5".to_string())]
    );
}

#[test]
fn test_latest_minor_takes_newest() {
    let hive = TempDir::new().unwrap();
    for v in ["3.1.0", "3.1.5", "3.9.0"] {
        write_framework(hive.path(), "Microsoft.NETCore.App", v);
    }
    let app_dir = TempDir::new().unwrap();
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"framework":
            {"name": "Microsoft.NETCore.App", "version": "3.1.0",
             "rollForward": "latestMinor"}}}"#,
    );

    let definitions = resolve(&app, &[hive.path().to_path_buf()]).unwrap();
    assert_eq!(found_versions(&definitions)[0].1, "3.9.0");
}

#[test]
fn test_disable_requires_exact_install() {
    let hive = TempDir::new().unwrap();
    write_framework(hive.path(), "Microsoft.NETCore.App", "3.1.1");
    let app_dir = TempDir::new().unwrap();
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"framework":
            {"name": "Microsoft.NETCore.App", "version": "3.1.0",
             "rollForward": "disable"}}}"#,
    );

    let err = resolve(&app, &[hive.path().to_path_buf()]).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::FrameworkMissingFailure);
    // The diagnostic enumerates what is installed.
    assert!(err.to_string().contains("3.1.1"));
}

#[test]
fn test_prerelease_excluded_for_release_request() {
    let hive = TempDir::new().unwrap();
    write_framework(hive.path(), "Microsoft.NETCore.App", "6.0.1-rc.1");
    let app_dir = TempDir::new().unwrap();
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"framework":
            {"name": "Microsoft.NETCore.App", "version": "6.0.0"}}}"#,
    );

    assert!(resolve(&app, &[hive.path().to_path_buf()]).is_err());

    // A prerelease request admits prerelease installs.
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"framework":
            {"name": "Microsoft.NETCore.App", "version": "6.0.0-preview.1"}}}"#,
    );
    assert!(resolve(&app, &[hive.path().to_path_buf()]).is_ok());
}

#[test]
fn test_nearest_hive_wins_version_tie() {
    let near = TempDir::new().unwrap();
    let far = TempDir::new().unwrap();
    write_framework(near.path(), "Microsoft.NETCore.App", "6.0.1");
    write_framework(far.path(), "Microsoft.NETCore.App", "6.0.1");
    let app_dir = TempDir::new().unwrap();
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"framework":
            {"name": "Microsoft.NETCore.App", "version": "6.0.0"}}}"#,
    );

    let hives = vec![near.path().to_path_buf(), far.path().to_path_buf()];
    let definitions = resolve(&app, &hives).unwrap();
    assert!(definitions[1].dir.starts_with(near.path()));
}

#[test]
fn test_marker_file_gates_install() {
    let hive = TempDir::new().unwrap();
    // Version directory exists but carries no deps.json marker.
    std::fs::create_dir_all(hive.path().join("shared/Microsoft.NETCore.App/6.0.1")).unwrap();
    let app_dir = TempDir::new().unwrap();
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"framework":
            {"name": "Microsoft.NETCore.App", "version": "6.0.0"}}}"#,
    );

    let err = resolve(&app, &[hive.path().to_path_buf()]).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::FrameworkMissingFailure);
}

#[test]
fn test_self_contained_app_resolves_no_frameworks() {
    let app_dir = TempDir::new().unwrap();
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"includedFrameworks": [
            {"name": "Microsoft.NETCore.App", "version": "6.0.0"}]}}"#,
    );

    let definitions = resolve(&app, &[]).unwrap();
    assert_eq!(definitions.len(), 1);
    assert!(definitions[0].found_version.is_empty());
}

// =============================================================================
// Transitive resolution and reconciliation
// =============================================================================

#[test]
fn test_transitive_reference_reconciled_to_single_entry() {
    let hive = TempDir::new().unwrap();
    write_framework(hive.path(), "Microsoft.NETCore.App", "3.1.0");
    write_framework(hive.path(), "Microsoft.NETCore.App", "3.1.5");
    // AspNetCore's own config tightens the shared NETCore reference.
    write_framework_with_config(
        hive.path(),
        "Microsoft.AspNetCore.App",
        "3.1.2",
        r#"{"runtimeOptions": {"framework":
            {"name": "Microsoft.NETCore.App", "version": "3.1.2",
             "rollForward": "latestPatch"}}}"#,
    );

    let app_dir = TempDir::new().unwrap();
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"frameworks": [
            {"name": "Microsoft.AspNetCore.App", "version": "3.1.0"},
            {"name": "Microsoft.NETCore.App", "version": "3.1.0"}]}}"#,
    );

    let definitions = resolve(&app, &[hive.path().to_path_buf()]).unwrap();
    let versions = found_versions(&definitions);
    // One entry per framework; the merged reference (3.1.2, latestPatch)
    // resolves NETCore to the latest 3.1 patch.
    assert_eq!(versions.len(), 2);
    assert!(versions.contains(&("Microsoft.AspNetCore.App".to_string(), "3.1.2".to_string())));
    assert!(versions.contains(&("Microsoft.NETCore.App".to_string(), "3.1.5".to_string())));
}

#[test]
fn test_incompatible_references_name_both_requesters() {
    let hive = TempDir::new().unwrap();
    write_framework(hive.path(), "Microsoft.NETCore.App", "3.1.0");
    write_framework(hive.path(), "Microsoft.NETCore.App", "3.2.0");
    write_framework_with_config(
        hive.path(),
        "Microsoft.AspNetCore.App",
        "3.1.2",
        r#"{"runtimeOptions": {"framework":
            {"name": "Microsoft.NETCore.App", "version": "3.2.0"}}}"#,
    );

    let app_dir = TempDir::new().unwrap();
    // The app pins NETCore exactly; AspNetCore needs a higher version the
    // pin cannot reach.
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"frameworks": [
            {"name": "Microsoft.NETCore.App", "version": "3.1.0",
             "rollForward": "disable"},
            {"name": "Microsoft.AspNetCore.App", "version": "3.1.0"}]}}"#,
    );

    let err = resolve(&app, &[hive.path().to_path_buf()]).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::FrameworkCompatFailure);
    let msg = err.to_string();
    assert!(msg.contains("app"));
    assert!(msg.contains("Microsoft.AspNetCore.App"));
}

#[test]
fn test_tightened_reference_re_resolves_earlier_framework() {
    let hive = TempDir::new().unwrap();
    write_framework(hive.path(), "Microsoft.NETCore.App", "3.1.0");
    write_framework(hive.path(), "Microsoft.NETCore.App", "3.1.5");
    write_framework_with_config(
        hive.path(),
        "Microsoft.AspNetCore.App",
        "3.1.2",
        r#"{"runtimeOptions": {"framework":
            {"name": "Microsoft.NETCore.App", "version": "3.1.2",
             "rollForward": "latestPatch"}}}"#,
    );

    let app_dir = TempDir::new().unwrap();
    // NETCore is listed first and resolves before AspNetCore tightens it;
    // the pass restarts and the final set holds exactly one NETCore entry.
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"frameworks": [
            {"name": "Microsoft.NETCore.App", "version": "3.1.0"},
            {"name": "Microsoft.AspNetCore.App", "version": "3.1.0"}]}}"#,
    );

    let definitions = resolve(&app, &[hive.path().to_path_buf()]).unwrap();
    let netcore: Vec<_> = found_versions(&definitions)
        .into_iter()
        .filter(|(name, _)| name == "Microsoft.NETCore.App")
        .collect();
    assert_eq!(netcore.len(), 1);
    assert_eq!(netcore[0].1, "3.1.5");
}

#[test]
fn test_feature_roll_forward_rejected_for_frameworks() {
    let app_dir = TempDir::new().unwrap();
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"framework":
            {"name": "Microsoft.NETCore.App", "version": "6.0.0",
             "rollForward": "feature"}}}"#,
    );
    let err = resolve(&app, &[]).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::InvalidConfigFile);
}

#[test]
fn test_roll_forward_override_applies_to_first_reference() {
    let hive = TempDir::new().unwrap();
    write_framework(hive.path(), "Microsoft.NETCore.App", "3.1.0");
    write_framework(hive.path(), "Microsoft.NETCore.App", "3.9.0");
    let app_dir = TempDir::new().unwrap();
    let app = write_app(
        app_dir.path(),
        r#"{"runtimeOptions": {"framework":
            {"name": "Microsoft.NETCore.App", "version": "3.1.0"}}}"#,
    );

    let config = RuntimeConfig::from_file(&RuntimeConfig::path_for_app(&app)).unwrap();
    let definitions = resolve_frameworks_for_app(
        &app,
        config,
        &[hive.path().to_path_buf()],
        Some(RollForwardPolicy::LatestMinor),
    )
    .unwrap();
    assert_eq!(found_versions(&definitions)[0].1, "3.9.0");
}

// =============================================================================
// SDK resolution
// =============================================================================

#[test]
fn test_sdk_resolution_honors_global_json_patch_band() {
    let hive = TempDir::new().unwrap();
    write_sdk(hive.path(), "8.0.101");
    write_sdk(hive.path(), "8.0.103");
    write_sdk(hive.path(), "8.0.203");

    let project = TempDir::new().unwrap();
    std::fs::write(
        project.path().join("global.json"),
        r#"{"sdk": {"version": "8.0.100"}}"#,
    )
    .unwrap();

    let resolver = SdkResolver::from_nearest_global_file(project.path());
    let resolved = resolver.resolve_or_error(hive.path()).unwrap();
    // Patch default stays inside the 8.0.1xx feature band.
    assert!(resolved.ends_with("sdk/8.0.103"));
}

#[test]
fn test_sdk_resolution_without_global_json_takes_latest() {
    let hive = TempDir::new().unwrap();
    write_sdk(hive.path(), "6.0.400");
    write_sdk(hive.path(), "8.0.100-rc.2");

    let project = TempDir::new().unwrap();
    let resolver = SdkResolver::from_nearest_global_file(project.path());
    let resolved = resolver.resolve_or_error(hive.path()).unwrap();
    // No constraints at all: prereleases included, newest wins.
    assert!(resolved.ends_with("sdk/8.0.100-rc.2"));
}

#[test]
fn test_malformed_global_json_is_discarded_wholesale() {
    let hive = TempDir::new().unwrap();
    write_sdk(hive.path(), "6.0.400");

    let project = TempDir::new().unwrap();
    // The version alone would resolve; the bad rollForward poisons the
    // whole file and the resolver falls back to latest-installed.
    std::fs::write(
        project.path().join("global.json"),
        r#"{"sdk": {"version": "9.9.900", "rollForward": "sideways"}}"#,
    )
    .unwrap();

    let resolver = SdkResolver::from_nearest_global_file(project.path());
    let resolved = resolver.resolve_or_error(hive.path()).unwrap();
    assert!(resolved.ends_with("sdk/6.0.400"));
}

#[test]
fn test_sdk_failure_lists_installed_and_custom_message() {
    let hive = TempDir::new().unwrap();
    write_sdk(hive.path(), "6.0.400");

    let project = TempDir::new().unwrap();
    std::fs::write(
        project.path().join("global.json"),
        r#"{"sdk": {"version": "8.0.100",
            "errorMessage": "install the 8.0 SDK from contoso.example"}}"#,
    )
    .unwrap();

    let resolver = SdkResolver::from_nearest_global_file(project.path());
    let err = resolver.resolve_or_error(hive.path()).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::SdkResolverResolveFailure);
    let msg = err.to_string();
    assert!(msg.contains("8.0.100"));
    assert!(msg.contains("6.0.400"));
    assert!(msg.contains("contoso.example"));
}

#[test]
fn test_sdk_paths_first_root_wins() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_sdk(first.path(), "8.0.100");
    write_sdk(second.path(), "9.0.100");

    let project = TempDir::new().unwrap();
    std::fs::write(
        project.path().join("global.json"),
        format!(
            r#"{{"sdk": {{"paths": ["{}", "{}"]}}}}"#,
            first.path().display(),
            second.path().display()
        ),
    )
    .unwrap();

    let resolver = SdkResolver::from_nearest_global_file(project.path());
    let resolved = resolver.resolve_or_error(Path::new("/nonexistent")).unwrap();
    assert!(resolved.ends_with("sdk/8.0.100"));
}

// =============================================================================
// Version ordering sanity at the API surface
// =============================================================================

#[test]
fn test_version_ordering_matches_semver_rules() {
    let ordered = [
        "1.0.0-alpha",
        "1.0.0-alpha.1",
        "1.0.0-alpha.beta",
        "1.0.0-beta.2",
        "1.0.0-beta.11",
        "1.0.0-rc.1",
        "1.0.0",
        "1.0.1",
    ];
    for pair in ordered.windows(2) {
        let a: FxVersion = pair[0].parse().unwrap();
        let b: FxVersion = pair[1].parse().unwrap();
        assert!(a < b, "{} should sort before {}", pair[0], pair[1]);
    }
    // Build metadata is carried but ignored for ordering.
    let a: FxVersion = "1.0.0+build.1".parse().unwrap();
    let b: FxVersion = "1.0.0+build.2".parse().unwrap();
    assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
}
