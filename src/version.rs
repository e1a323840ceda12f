//! Version parsing and total ordering.
//!
//! Versions are strict `major.minor.patch[-pre][+build]` strings. Build
//! metadata is carried for round-tripping but never participates in
//! comparison. Parsing rejects anything out of shape rather than guessing:
//! leading zeros, empty identifiers, and stray characters are all errors.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::status::HostError;

/// A parsed version with the SemVer-without-build total order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FxVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    /// Raw dot-separated prerelease identifiers (`alpha.1`), if any.
    pub prerelease: Option<String>,
    /// Raw build metadata. Round-tripped, ignored by `Ord`.
    pub build: Option<String>,
}

impl FxVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Parse a version string, allowing prerelease and build suffixes.
    pub fn parse(s: &str) -> Result<Self, HostError> {
        Self::parse_internal(s, false)
    }

    /// Parse a version string, rejecting any `-` or `+` suffix.
    pub fn parse_production(s: &str) -> Result<Self, HostError> {
        Self::parse_internal(s, true)
    }

    fn parse_internal(s: &str, production_only: bool) -> Result<Self, HostError> {
        let invalid = || HostError::InvalidVersion(s.to_string());

        if s.is_empty() {
            return Err(invalid());
        }
        if production_only && (s.contains('-') || s.contains('+')) {
            return Err(invalid());
        }

        let (rest, build) = match s.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (s, None),
        };
        let (numbers, prerelease) = match rest.split_once('-') {
            Some((numbers, pre)) => (numbers, Some(pre)),
            None => (rest, None),
        };

        let mut fields = numbers.split('.');
        let major = parse_numeric_field(fields.next().ok_or_else(invalid)?).ok_or_else(invalid)?;
        let minor = parse_numeric_field(fields.next().ok_or_else(invalid)?).ok_or_else(invalid)?;
        let patch = parse_numeric_field(fields.next().ok_or_else(invalid)?).ok_or_else(invalid)?;
        if fields.next().is_some() {
            return Err(invalid());
        }

        if let Some(pre) = prerelease {
            for id in pre.split('.') {
                if !valid_identifier(id) {
                    return Err(invalid());
                }
                // Numeric prerelease identifiers must not carry a leading zero.
                if id.bytes().all(|b| b.is_ascii_digit()) && id.len() > 1 && id.starts_with('0') {
                    return Err(invalid());
                }
            }
        }
        if let Some(build) = build {
            for id in build.split('.') {
                if !valid_identifier(id) {
                    return Err(invalid());
                }
            }
        }

        Ok(FxVersion {
            major,
            minor,
            patch,
            prerelease: prerelease.map(str::to_string),
            build: build.map(str::to_string),
        })
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// True for the zeroed sentinel used when no version was requested.
    pub fn is_empty(&self) -> bool {
        *self == FxVersion::default()
    }

    /// SDK feature band: patch versions released together, `patch / 100`.
    pub fn feature_band(&self) -> u32 {
        self.patch / 100
    }

    /// Glob matching every prerelease of this `major.minor.patch`.
    pub fn prerelease_glob(&self) -> String {
        format!("{}.{}.{}-*", self.major, self.minor, self.patch)
    }

    /// Glob matching every patch of this `major.minor`.
    pub fn patch_glob(&self) -> String {
        format!("{}.{}.*", self.major, self.minor)
    }
}

/// A numeric field: ASCII digits only, no leading zero unless exactly "0".
fn parse_numeric_field(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

/// Identifiers are nonempty runs of `[0-9A-Za-z-]`.
fn valid_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

impl FromStr for FxVersion {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FxVersion::parse(s)
    }
}

impl fmt::Display for FxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ref pre) = self.prerelease {
            write!(f, "-{pre}")?;
        }
        if let Some(ref build) = self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

impl PartialOrd for FxVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FxVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                // A release is greater than any prerelease of the same triple.
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => compare_prerelease(a, b),
            })
    }
}

fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let mut ids_a = a.split('.');
    let mut ids_b = b.split('.');
    loop {
        match (ids_a.next(), ids_b.next()) {
            (None, None) => return Ordering::Equal,
            // An exhausted strict prefix sorts lower.
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = compare_identifier(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn compare_identifier(a: &str, b: &str) -> Ordering {
    let a_num = a.bytes().all(|b| b.is_ascii_digit());
    let b_num = b.bytes().all(|b| b.is_ascii_digit());
    match (a_num, b_num) {
        // No leading zeros, so length order equals numeric order.
        (true, true) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> FxVersion {
        FxVersion::parse(s).unwrap()
    }

    #[test]
    fn test_parse_basic() {
        let parsed = v("3.1.22");
        assert_eq!((parsed.major, parsed.minor, parsed.patch), (3, 1, 22));
        assert!(parsed.prerelease.is_none());
        assert!(parsed.build.is_none());
    }

    #[test]
    fn test_parse_prerelease_and_build() {
        let parsed = v("6.0.0-preview.7.21377.19+sha.abc123");
        assert_eq!(parsed.prerelease.as_deref(), Some("preview.7.21377.19"));
        assert_eq!(parsed.build.as_deref(), Some("sha.abc123"));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        for bad in ["", "1", "1.2", "1.2.3.4", "1..3", "1.2.", ".1.2", "a.b.c", "1.2.x"] {
            assert!(FxVersion::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_leading_zero_rejection() {
        assert!(FxVersion::parse("1.00.0").is_err());
        assert!(FxVersion::parse("01.0.0").is_err());
        assert!(FxVersion::parse("1.0.0-01").is_err());
        assert!(FxVersion::parse("1.0.0-0").is_ok());
        assert!(FxVersion::parse("0.0.0").is_ok());
    }

    #[test]
    fn test_empty_identifiers_rejected() {
        assert!(FxVersion::parse("1.0.0-").is_err());
        assert!(FxVersion::parse("1.0.0-alpha..1").is_err());
        assert!(FxVersion::parse("1.0.0+").is_err());
        assert!(FxVersion::parse("1.0.0-alpha+").is_err());
    }

    #[test]
    fn test_identifier_alphabet() {
        assert!(FxVersion::parse("1.0.0-rc-1").is_ok());
        assert!(FxVersion::parse("1.0.0-rc_1").is_err());
        assert!(FxVersion::parse("1.0.0-rc.1!").is_err());
    }

    #[test]
    fn test_production_only() {
        assert!(FxVersion::parse_production("3.1.0").is_ok());
        assert!(FxVersion::parse_production("3.1.0-preview.1").is_err());
        assert!(FxVersion::parse_production("3.1.0+build").is_err());
    }

    #[test]
    fn test_prerelease_ordering_vector() {
        // The canonical SemVer ladder.
        let ladder = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
        ];
        for pair in ladder.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_numeric_identifier_less_than_alpha() {
        assert!(v("1.0.0-1") < v("1.0.0-a"));
        assert!(v("1.0.0-999") < v("1.0.0-0a"));
    }

    #[test]
    fn test_build_ignored_in_comparison() {
        assert_eq!(v("1.2.3+linux").cmp(&v("1.2.3+windows")), Ordering::Equal);
        assert_eq!(v("1.2.3-rc.1+a").cmp(&v("1.2.3-rc.1")), Ordering::Equal);
    }

    #[test]
    fn test_total_order_trichotomy() {
        let versions = [
            v("0.0.0"),
            v("1.0.0-alpha"),
            v("1.0.0"),
            v("1.0.1"),
            v("1.1.0"),
            v("2.0.0-rc.2"),
            v("2.0.0"),
        ];
        for a in &versions {
            for b in &versions {
                let lt = a < b;
                let eq = a == b;
                let gt = a > b;
                assert_eq!(
                    [lt, eq, gt].iter().filter(|x| **x).count(),
                    1,
                    "trichotomy failed for {a} vs {b}"
                );
            }
        }
        // Transitivity over the sorted ladder.
        for w in versions.windows(3) {
            assert!(w[0] < w[1] && w[1] < w[2] && w[0] < w[2]);
        }
    }

    #[test]
    fn test_round_trip() {
        for s in ["1.2.3", "1.2.3-alpha.1", "1.2.3+build.5", "10.20.30-rc.1+exp.sha"] {
            let parsed = v(s);
            assert_eq!(parsed.to_string(), s);
            assert_eq!(FxVersion::parse(&parsed.to_string()).unwrap().cmp(&parsed), Ordering::Equal);
        }
    }

    #[test]
    fn test_feature_band() {
        assert_eq!(v("8.0.100").feature_band(), 1);
        assert_eq!(v("8.0.205").feature_band(), 2);
        assert_eq!(v("8.0.99").feature_band(), 0);
    }

    #[test]
    fn test_globs() {
        let parsed = v("3.1.5");
        assert_eq!(parsed.prerelease_glob(), "3.1.5-*");
        assert_eq!(parsed.patch_glob(), "3.1.*");
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(FxVersion::default().is_empty());
        assert!(!v("0.0.1").is_empty());
    }
}
