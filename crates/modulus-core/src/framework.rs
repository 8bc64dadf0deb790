//! Framework profiles (spec §3, §4's "framework model", C3).
//!
//! A [`FrameworkProfile`] is just `(identifier, version)`; the partial order
//! describing when a library targeting profile A is acceptable to a
//! consumer targeting profile B is an *external* lookup (spec §3: "The
//! compatibility relation is an external lookup, not recomputed"), injected
//! here as a small static compatibility table seeded with the common
//! generations, plus an escape hatch for callers that supply their own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A versioned target-framework identifier, e.g. `net8.0` or `netstandard2.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct FrameworkProfile {
    pub identifier: String,
    pub version: String,
}

impl FrameworkProfile {
    #[must_use]
    pub fn new(identifier: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            version: version.into(),
        }
    }

    /// Parse the shorthand moniker form, e.g. `"net8.0"` -> identifier
    /// `"net"`, version `"8.0"`.
    #[must_use]
    pub fn parse_moniker(moniker: &str) -> Self {
        let split_at = moniker
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit())
            .map_or(moniker.len(), |(i, _)| i);
        let (identifier, version) = moniker.split_at(split_at);
        Self::new(identifier, if version.is_empty() { "0.0" } else { version })
    }
}

impl fmt::Display for FrameworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.identifier, self.version)
    }
}

/// A compatibility table: for each consumer profile, the set of library
/// profiles it accepts (including itself). Built once and treated as an
/// external, injectable dependency rather than something the walker derives.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityTable {
    edges: ahash::AHashMap<FrameworkProfile, Vec<FrameworkProfile>>,
}

impl CompatibilityTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `consumer` accepts libraries built for `library`.
    pub fn allow(&mut self, consumer: FrameworkProfile, library: FrameworkProfile) {
        self.edges.entry(consumer).or_default().push(library);
    }

    /// Whether `library` is acceptable to `consumer`. A profile is always
    /// compatible with itself.
    #[must_use]
    pub fn is_compatible(&self, library: &FrameworkProfile, consumer: &FrameworkProfile) -> bool {
        if library == consumer {
            return true;
        }
        self.edges
            .get(consumer)
            .is_some_and(|accepted| accepted.contains(library))
    }

    /// A table seeded with the common "framework vN.x accepts standard
    /// vM.y where M <= N" style lineage used by most modern runtimes.
    #[must_use]
    pub fn with_standard_lineage() -> Self {
        let mut table = Self::new();
        let net = |v: &str| FrameworkProfile::new("net", v);
        let standard = |v: &str| FrameworkProfile::new("netstandard", v);
        for net_version in ["5.0", "6.0", "7.0", "8.0", "9.0"] {
            for std_version in ["2.0", "2.1"] {
                table.allow(net(net_version), standard(std_version));
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shorthand_moniker() {
        let p = FrameworkProfile::parse_moniker("net8.0");
        assert_eq!(p.identifier, "net");
        assert_eq!(p.version, "8.0");
    }

    #[test]
    fn profile_is_always_compatible_with_itself() {
        let table = CompatibilityTable::new();
        let p = FrameworkProfile::new("net", "8.0");
        assert!(table.is_compatible(&p, &p));
    }

    #[test]
    fn standard_lineage_accepts_netstandard() {
        let table = CompatibilityTable::with_standard_lineage();
        let net8 = FrameworkProfile::new("net", "8.0");
        let standard2 = FrameworkProfile::new("netstandard", "2.0");
        assert!(table.is_compatible(&standard2, &net8));
    }

    #[test]
    fn unrelated_profiles_are_incompatible() {
        let table = CompatibilityTable::with_standard_lineage();
        let net8 = FrameworkProfile::new("net", "8.0");
        let other = FrameworkProfile::new("xamarin", "1.0");
        assert!(!table.is_compatible(&other, &net8));
    }
}
