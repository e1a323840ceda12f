//! Roll-forward policies and the policy-parameterized best-match search.
//!
//! The same matcher backs SDK and framework resolution. Its central
//! invariant is the dual comparison mode: `Latest*` policies (and empty
//! requests) take the greatest qualifying version installed, while the
//! plain policies take the version *nearest above* the request. Candidates
//! that agree up to the granularity a policy cares about (same feature band
//! for SDKs, same `major.minor` for frameworks) always compare
//! latest-wins, which is what rolls a patch level forward.

use std::fmt;
use std::str::FromStr;

use crate::install::InstalledComponent;
use crate::status::HostError;
use crate::version::FxVersion;

/// The closed set of roll-forward policies, in ordinal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollForwardPolicy {
    Disable,
    Patch,
    Feature,
    Minor,
    Major,
    LatestPatch,
    LatestFeature,
    LatestMinor,
    LatestMajor,
}

/// Whether versions carry a feature band (`patch / 100`).
///
/// Only SDK versions do; framework references reject the feature-band
/// policies outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionKind {
    Framework,
    Sdk,
}

/// How wide a range of versions a policy is willing to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Band {
    Exact,
    Patch,
    Feature,
    Minor,
    Major,
}

impl RollForwardPolicy {
    pub fn is_latest(self) -> bool {
        matches!(
            self,
            RollForwardPolicy::LatestPatch
                | RollForwardPolicy::LatestFeature
                | RollForwardPolicy::LatestMinor
                | RollForwardPolicy::LatestMajor
        )
    }

    pub fn band(self) -> Band {
        match self {
            RollForwardPolicy::Disable => Band::Exact,
            RollForwardPolicy::Patch | RollForwardPolicy::LatestPatch => Band::Patch,
            RollForwardPolicy::Feature | RollForwardPolicy::LatestFeature => Band::Feature,
            RollForwardPolicy::Minor | RollForwardPolicy::LatestMinor => Band::Minor,
            RollForwardPolicy::Major | RollForwardPolicy::LatestMajor => Band::Major,
        }
    }

    /// Policies that probe the literal requested directory before scanning.
    /// Purely a fast path; the scan loop prefers the exact version for
    /// these policies too, so the outcomes agree.
    pub fn exact_match_preferred(self) -> bool {
        matches!(self, RollForwardPolicy::Disable | RollForwardPolicy::Patch)
    }
}

impl FromStr for RollForwardPolicy {
    type Err = HostError;

    /// Accepts the camelCase config names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disable" => Ok(RollForwardPolicy::Disable),
            "patch" => Ok(RollForwardPolicy::Patch),
            "feature" => Ok(RollForwardPolicy::Feature),
            "minor" => Ok(RollForwardPolicy::Minor),
            "major" => Ok(RollForwardPolicy::Major),
            "latestpatch" => Ok(RollForwardPolicy::LatestPatch),
            "latestfeature" => Ok(RollForwardPolicy::LatestFeature),
            "latestminor" => Ok(RollForwardPolicy::LatestMinor),
            "latestmajor" => Ok(RollForwardPolicy::LatestMajor),
            _ => Err(HostError::InvalidArg(format!(
                "unknown roll-forward policy: {s}"
            ))),
        }
    }
}

impl fmt::Display for RollForwardPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RollForwardPolicy::Disable => "disable",
            RollForwardPolicy::Patch => "patch",
            RollForwardPolicy::Feature => "feature",
            RollForwardPolicy::Minor => "minor",
            RollForwardPolicy::Major => "major",
            RollForwardPolicy::LatestPatch => "latestPatch",
            RollForwardPolicy::LatestFeature => "latestFeature",
            RollForwardPolicy::LatestMinor => "latestMinor",
            RollForwardPolicy::LatestMajor => "latestMajor",
        };
        f.write_str(name)
    }
}

/// Does `candidate` satisfy `requested` under `policy`?
///
/// With no requested version every non-prerelease candidate qualifies
/// (subject to `allow_prerelease`). No form of this predicate ever accepts
/// a candidate below the requested version.
pub fn matches_policy(
    candidate: &FxVersion,
    requested: Option<&FxVersion>,
    policy: RollForwardPolicy,
    allow_prerelease: bool,
    kind: VersionKind,
) -> bool {
    if !allow_prerelease && candidate.is_prerelease() {
        return false;
    }
    let Some(requested) = requested else {
        return true;
    };
    if candidate < requested {
        return false;
    }
    match policy.band() {
        Band::Exact => candidate == requested,
        Band::Patch => {
            candidate.major == requested.major
                && candidate.minor == requested.minor
                && (kind == VersionKind::Framework
                    || candidate.feature_band() == requested.feature_band())
        }
        Band::Feature => {
            candidate.major == requested.major && candidate.minor == requested.minor
        }
        Band::Minor => candidate.major == requested.major,
        Band::Major => true,
    }
}

/// Is `candidate` a better pick than `previous_best`?
///
/// Latest mode (greater wins) applies when there is no requested version,
/// when the policy is a `Latest*` variant, or when the two candidates agree
/// up to the policy granularity. Otherwise the lesser wins: plain policies
/// roll forward to the nearest qualifying version, not the newest
/// installed.
pub fn is_better_match(
    candidate: &FxVersion,
    previous_best: Option<&FxVersion>,
    requested: Option<&FxVersion>,
    policy: RollForwardPolicy,
    kind: VersionKind,
) -> bool {
    let Some(previous) = previous_best else {
        return true;
    };
    let use_latest = requested.is_none()
        || policy.is_latest()
        || equal_at_granularity(candidate, previous, kind);
    if use_latest {
        candidate > previous
    } else {
        candidate < previous
    }
}

/// Candidates that differ only below the granularity the matcher cares
/// about: same feature band for SDK versions, same `major.minor` for
/// framework versions.
fn equal_at_granularity(a: &FxVersion, b: &FxVersion, kind: VersionKind) -> bool {
    a.major == b.major
        && a.minor == b.minor
        && (kind == VersionKind::Framework || a.feature_band() == b.feature_band())
}

/// Run the scan-filter-compare loop over an [`crate::install`]-ordered
/// candidate list and return the winning component.
///
/// The list is walked from the end so that, among equal versions found in
/// several hives, the nearest hive wins the tie (see the ordering invariant
/// in the install scanner).
pub fn resolve_best<'a>(
    installed: &'a [InstalledComponent],
    requested: Option<&FxVersion>,
    policy: RollForwardPolicy,
    allow_prerelease: bool,
    kind: VersionKind,
) -> Option<&'a InstalledComponent> {
    // Exact-preferring policies take the literal requested version whenever
    // it is installed, which keeps this loop's outcome identical to the
    // directory-probe fast path.
    if policy.exact_match_preferred()
        && let Some(requested) = requested
    {
        if let Some(exact) = installed.iter().rev().find(|c| c.version == *requested) {
            return Some(exact);
        }
        if policy == RollForwardPolicy::Disable {
            return None;
        }
    }

    let mut best: Option<&InstalledComponent> = None;
    for component in installed.iter().rev() {
        if !matches_policy(&component.version, requested, policy, allow_prerelease, kind) {
            continue;
        }
        if is_better_match(
            &component.version,
            best.map(|c| &c.version),
            requested,
            policy,
            kind,
        ) {
            best = Some(component);
        }
    }
    best
}
