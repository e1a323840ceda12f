//! Transitive framework reference resolution.
//!
//! The app declares framework references; each resolved framework's own
//! runtime config may declare more. References to the same framework are
//! reconciled into a single effective reference, and a framework already
//! pinned on disk is re-resolved whenever reconciliation tightens its
//! reference, so discovery order never affects the outcome.
//!
//! The control flow is an explicit fixed-point loop over a name-keyed map
//! with a work queue. Re-resolving an already-visited framework restarts
//! the pass; effective requested versions only grow and policy bands only
//! narrow, so the loop terminates.

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::runtime::{FrameworkReference, RuntimeConfig};
use crate::install::{self, InstalledComponent};
use crate::rollforward::{self, Band, RollForwardPolicy, VersionKind};
use crate::status::HostError;
use crate::version::FxVersion;

/// A framework resolved to a concrete installed directory.
///
/// Entries are appended to an ordered vector with the app at index 0 and
/// are immutable after creation; re-resolution replaces an entry rather
/// than mutating it in place.
#[derive(Debug, Clone)]
pub struct FxDefinition {
    pub name: String,
    pub dir: PathBuf,
    pub requested_version: FxVersion,
    pub found_version: FxVersion,
    pub config: RuntimeConfig,
}

impl FxDefinition {
    fn for_app(app_name: &str, app_dir: &Path, config: RuntimeConfig) -> Self {
        Self {
            name: app_name.to_string(),
            dir: app_dir.to_path_buf(),
            requested_version: FxVersion::default(),
            found_version: FxVersion::default(),
            config,
        }
    }
}

/// One resolution pass's mutable state: the effective (reconciled)
/// reference per framework name, and the oldest reference ever seen for
/// diagnostics.
struct ReconciliationState {
    effective: BTreeMap<String, FrameworkReference>,
    oldest: BTreeMap<String, FrameworkReference>,
    /// Who declared the current effective reference, for conflict errors.
    requester: BTreeMap<String, String>,
}

impl ReconciliationState {
    fn new() -> Self {
        Self {
            effective: BTreeMap::new(),
            oldest: BTreeMap::new(),
            requester: BTreeMap::new(),
        }
    }

    fn insert_new(&mut self, reference: FrameworkReference, requester: &str) {
        self.oldest
            .insert(reference.name.clone(), reference.clone());
        self.requester
            .insert(reference.name.clone(), requester.to_string());
        self.effective.insert(reference.name.clone(), reference);
    }

    fn record_oldest(&mut self, reference: &FrameworkReference) {
        if let Some(oldest) = self.oldest.get_mut(&reference.name)
            && reference.version < oldest.version
        {
            *oldest = reference.clone();
        }
    }
}

/// Resolve the app's transitive framework references against the hive
/// list. Returns the definitions in discovery order, app first. A
/// self-contained config yields just the app definition.
pub fn resolve_frameworks_for_app(
    app_path: &Path,
    app_config: RuntimeConfig,
    hives: &[PathBuf],
    roll_forward_override: Option<RollForwardPolicy>,
) -> Result<Vec<FxDefinition>, HostError> {
    let app_name = app_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let app_dir = app_path.parent().unwrap_or(Path::new("."));

    let mut seed = app_config.frameworks().to_vec();
    // An env/CLI override applies to the app's first reference only.
    if let Some(policy) = roll_forward_override
        && let Some(first) = seed.first_mut()
    {
        reject_feature_band(&FrameworkReference { roll_forward: policy, ..first.clone() })?;
        first.roll_forward = policy;
    }

    let app_definition = FxDefinition::for_app(&app_name, app_dir, app_config);
    if seed.is_empty() {
        return Ok(vec![app_definition]);
    }

    let mut state = ReconciliationState::new();
    let mut seed_order = Vec::new();
    for reference in seed {
        reject_feature_band(&reference)?;
        seed_order.push(reference.name.clone());
        match state.effective.get(&reference.name).cloned() {
            None => state.insert_new(reference, &app_name),
            Some(existing) => {
                let merged = reconcile(&state, &existing, &reference, &app_name)?;
                state.record_oldest(&reference);
                state.effective.insert(reference.name.clone(), merged);
            }
        }
    }

    // Fixed point: any reconciliation that tightens the reference of an
    // already-resolved framework restarts the pass with the updated maps.
    'pass: loop {
        let mut definitions = vec![app_definition.clone()];
        let mut resolved: BTreeMap<String, usize> = BTreeMap::new();
        let mut queue: VecDeque<String> = seed_order.iter().cloned().collect();

        while let Some(name) = queue.pop_front() {
            if resolved.contains_key(&name) {
                continue;
            }
            let reference = state.effective[&name].clone();
            let definition = resolve_reference(&reference, &state, hives)?;
            let fx_dir = definition.dir.clone();
            let children = definition.config.frameworks().to_vec();
            definitions.push(definition);
            resolved.insert(name.clone(), definitions.len() - 1);
            debug!(framework = %name, dir = %fx_dir.display(), "resolved framework");

            for child in children {
                reject_feature_band(&child)?;
                match state.effective.get(&child.name).cloned() {
                    None => {
                        state.insert_new(child.clone(), &name);
                    }
                    Some(existing) => {
                        let merged = reconcile(&state, &existing, &child, &name)?;
                        state.record_oldest(&child);
                        if merged != existing {
                            state.effective.insert(child.name.clone(), merged);
                            state.requester.insert(child.name.clone(), name.clone());
                            if resolved.contains_key(&child.name) {
                                // A stale definition exists; re-run the
                                // whole pass against the tightened maps.
                                debug!(framework = %child.name, "re-resolving after reconciliation");
                                continue 'pass;
                            }
                        }
                    }
                }
                if !resolved.contains_key(&child.name) {
                    queue.push_back(child.name.clone());
                }
            }
        }

        return Ok(definitions);
    }
}

/// Framework versions carry no feature band.
fn reject_feature_band(reference: &FrameworkReference) -> Result<(), HostError> {
    if reference.roll_forward.band() == Band::Feature {
        return Err(HostError::InvalidConfig {
            path: PathBuf::new(),
            reason: format!(
                "framework '{}' requests roll-forward '{}', which applies only to SDK versions",
                reference.name, reference.roll_forward
            ),
        });
    }
    Ok(())
}

/// Merge two references to the same framework.
///
/// The merged reference takes the higher requested version, the more
/// restrictive policy (narrower band; closest-mode on a band tie), and the
/// AND of the prerelease flags. Before merging, the lower-versioned
/// reference must be able to roll forward to the higher requested version
/// under its own policy; otherwise the requesters are fundamentally
/// incompatible.
fn reconcile(
    state: &ReconciliationState,
    existing: &FrameworkReference,
    incoming: &FrameworkReference,
    incoming_requester: &str,
) -> Result<FrameworkReference, HostError> {
    let (lower, higher) = if existing.version <= incoming.version {
        (existing, incoming)
    } else {
        (incoming, existing)
    };

    let reachable = rollforward::matches_policy(
        &higher.version,
        Some(&lower.version),
        lower.roll_forward,
        true,
        VersionKind::Framework,
    );
    if !reachable {
        let existing_requester = state
            .requester
            .get(&existing.name)
            .cloned()
            .unwrap_or_else(|| "app".to_string());
        return Err(HostError::FrameworkCompat {
            name: existing.name.clone(),
            first_requester: existing_requester,
            first_reference: existing.describe(),
            second_requester: incoming_requester.to_string(),
            second_reference: incoming.describe(),
        });
    }

    Ok(FrameworkReference {
        name: existing.name.clone(),
        version: higher.version.clone(),
        roll_forward: more_restrictive(existing.roll_forward, incoming.roll_forward),
        allow_prerelease: existing.allow_prerelease && incoming.allow_prerelease,
    })
}

/// The narrower band wins; on a band tie the closest-mode variant wins,
/// since it commits to the nearest qualifying version.
fn more_restrictive(a: RollForwardPolicy, b: RollForwardPolicy) -> RollForwardPolicy {
    match a.band().cmp(&b.band()) {
        std::cmp::Ordering::Less => a,
        std::cmp::Ordering::Greater => b,
        std::cmp::Ordering::Equal => {
            if a.is_latest() { b } else { a }
        }
    }
}

/// Resolve one effective reference to an installed directory and parse
/// that framework's own config.
fn resolve_reference(
    reference: &FrameworkReference,
    state: &ReconciliationState,
    hives: &[PathBuf],
) -> Result<FxDefinition, HostError> {
    let installed = install::scan_frameworks(hives, Some(&reference.name));
    let best = rollforward::resolve_best(
        &installed,
        Some(&reference.version),
        reference.roll_forward,
        reference.allow_prerelease,
        VersionKind::Framework,
    );
    let Some(best) = best else {
        return Err(missing_framework(reference, state, hives, &installed));
    };

    let dir = best.dir();
    let config = RuntimeConfig::for_framework(&dir, &reference.name)?;
    Ok(FxDefinition {
        name: reference.name.clone(),
        dir,
        requested_version: reference.version.clone(),
        found_version: best.version.clone(),
        config,
    })
}

fn missing_framework(
    reference: &FrameworkReference,
    state: &ReconciliationState,
    hives: &[PathBuf],
    installed: &[InstalledComponent],
) -> HostError {
    let oldest = state
        .oldest
        .get(&reference.name)
        .map(|r| r.version.to_string())
        .unwrap_or_else(|| reference.version.to_string());
    HostError::FrameworkMissing {
        name: reference.name.clone(),
        requested: format!("{} ({})", reference.version, reference.roll_forward),
        oldest,
        search_roots: hives.iter().map(|h| h.join("shared")).collect(),
        installed: installed.iter().map(|c| c.version.to_string()).collect(),
    }
}
