//! Version algebra (spec §4.1): four-component versions with an optional
//! pre-release tag, and ranges with independent min/max inclusivity plus a
//! "float behavior" describing which trailing component is still free to
//! move when the resolver picks a winner among several satisfying versions.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A four-component version with an optional pre-release tag.
///
/// Release versions sort after every pre-release with the same
/// `(major, minor, patch, revision)`; pre-release tags otherwise compare
/// lexicographically, matching spec §4.1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub revision: u64,
    pub pre: Option<String>,
}

impl Version {
    #[must_use]
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            revision: 0,
            pre: None,
        }
    }

    #[must_use]
    pub const fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    /// Parse `"major[.minor[.patch[.revision]]][-pre]"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim().trim_start_matches('v');
        let (numeric, pre) = match raw.split_once('-') {
            Some((n, p)) => (n, Some(p.to_string())),
            None => (raw, None),
        };

        let mut parts = numeric.split('.');
        let mut next = |part: Option<&str>| -> Result<u64> {
            match part {
                Some(s) if !s.is_empty() => s.parse::<u64>().map_err(|_| Error::InvalidRange {
                    raw: raw.to_string(),
                }),
                _ => Ok(0),
            }
        };

        let major = next(parts.next())?;
        let minor = next(parts.next())?;
        let patch = next(parts.next())?;
        let revision = next(parts.next())?;
        if parts.next().is_some() {
            return Err(Error::InvalidRange {
                raw: raw.to_string(),
            });
        }

        Ok(Self {
            major,
            minor,
            patch,
            revision,
            pre,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.patch, self.revision)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch, self.revision)
            .cmp(&(other.major, other.minor, other.patch, other.revision))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

/// Which trailing component of a range's `min` is still allowed to "float":
/// a floating range additionally requires every component more significant
/// than this one to match `min` exactly, leaving this component (and
/// anything more specific, including the pre-release tag) free (spec §4.1).
/// Parsed from a trailing `.*` (or `-*` for [`Self::Prerelease`]) in
/// [`VersionRange::parse`], e.g. `"1.2.*"` fixes major/minor and floats the
/// build component onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FloatBehavior {
    #[default]
    None,
    Prerelease,
    Revision,
    Build,
    Minor,
    Major,
    AbsoluteLatest,
}

impl FloatBehavior {
    /// How many of `(major, minor, patch, revision)` this behavior pins to
    /// an exact value against `min`; the rest (and the pre-release tag) are
    /// free.
    fn fixed_components(self) -> usize {
        match self {
            Self::None | Self::Prerelease => 4,
            Self::Revision => 3,
            Self::Build => 2,
            Self::Minor => 1,
            Self::Major | Self::AbsoluteLatest => 0,
        }
    }
}

/// A version-range constraint: `min ⋈ v ⋈ max` with independent
/// inclusivity flags, plus a float behavior and a flag marking
/// framework/GAC references that bypass version resolution entirely
/// (spec §3 `LibraryRange` invariant).
#[derive(Debug, Clone)]
pub struct VersionRange {
    pub min: Option<Version>,
    pub max: Option<Version>,
    pub min_inclusive: bool,
    pub max_inclusive: bool,
    pub float: FloatBehavior,
    /// True for framework/GAC references: `min`/`max` are ignored entirely.
    pub is_reference: bool,
}

impl VersionRange {
    /// The unconstrained range (`*`), not a framework/GAC reference.
    #[must_use]
    pub fn any() -> Self {
        Self {
            min: None,
            max: None,
            min_inclusive: true,
            max_inclusive: true,
            float: FloatBehavior::None,
            is_reference: false,
        }
    }

    /// A range matching exactly one version.
    #[must_use]
    pub fn exact(version: Version) -> Self {
        Self {
            min: Some(version.clone()),
            max: Some(version),
            min_inclusive: true,
            max_inclusive: true,
            float: FloatBehavior::None,
            is_reference: false,
        }
    }

    /// A framework/GAC reference range: always "satisfied", version
    /// resolution is bypassed by the caller (spec §4.2 framework/GAC
    /// providers).
    #[must_use]
    pub fn reference() -> Self {
        Self {
            min: None,
            max: None,
            min_inclusive: true,
            max_inclusive: true,
            float: FloatBehavior::None,
            is_reference: true,
        }
    }

    /// Half-open `[min, max)`.
    #[must_use]
    pub fn half_open(min: Version, max: Version) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            min_inclusive: true,
            max_inclusive: false,
            float: FloatBehavior::None,
            is_reference: false,
        }
    }

    /// Whether `version` satisfies this range. Framework/GAC references
    /// always satisfy, per spec §3's bypass invariant. A floating range
    /// (`self.float != FloatBehavior::None`) additionally requires the
    /// allowed component (or any more specific one) to be free (spec §4.1),
    /// in place of the plain `min ⋈ v ⋈ max` comparison.
    #[must_use]
    pub fn satisfies(&self, version: &Version) -> bool {
        if self.is_reference {
            return true;
        }
        if self.float != FloatBehavior::None {
            return self.satisfies_floating(version);
        }
        if let Some(min) = &self.min {
            match (version.cmp(min), self.min_inclusive) {
                (Ordering::Less, _) => return false,
                (Ordering::Equal, false) => return false,
                _ => {}
            }
        }
        if let Some(max) = &self.max {
            match (version.cmp(max), self.max_inclusive) {
                (Ordering::Greater, _) => return false,
                (Ordering::Equal, false) => return false,
                _ => {}
            }
        }
        true
    }

    fn satisfies_floating(&self, version: &Version) -> bool {
        let Some(min) = &self.min else { return true };
        let fixed = self.float.fixed_components();
        let components = [
            (min.major, version.major),
            (min.minor, version.minor),
            (min.patch, version.patch),
            (min.revision, version.revision),
        ];
        components[..fixed].iter().all(|(want, got)| want == got)
    }

    /// The single canonical string form used on both sides of lock-file
    /// validation (spec §9 Open Questions (a)/(b)). This is the *only*
    /// formatter for ranges anywhere in the workspace.
    #[must_use]
    pub fn canonical_form(&self) -> String {
        if self.is_reference {
            return "(framework-reference)".to_string();
        }
        let lo = match &self.min {
            Some(v) => v.to_string(),
            None => String::new(),
        };
        let hi = match &self.max {
            Some(v) => v.to_string(),
            None => String::new(),
        };
        let open = if self.min_inclusive { '[' } else { '(' };
        let close = if self.max_inclusive { ']' } else { ')' };
        format!("{open}{lo}, {hi}{close}")
    }
}

impl PartialEq for VersionRange {
    /// Range equality is defined by canonical string form, not structural
    /// comparison (spec §4.1: "Equality of ranges for lock-file
    /// canonicalisation uses the formatted string").
    fn eq(&self, other: &Self) -> bool {
        self.canonical_form() == other.canonical_form()
    }
}
impl Eq for VersionRange {}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_form())
    }
}

impl Serialize for VersionRange {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.canonical_form())
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        VersionRange::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl VersionRange {
    /// Parse the canonical `[min, max)`-style form, a bare version (treated
    /// as an exact match), `*` (treated as [`VersionRange::any`]), or a
    /// floating form (`"1.*"`, `"1.2.*"`, `"1.2.3.*"`, `"1.2.3-*"`), per
    /// spec §4.1's float behaviors.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw == "*" || raw.is_empty() {
            return Ok(Self::any());
        }
        if raw == "(framework-reference)" {
            return Ok(Self::reference());
        }
        if let Some(floating) = Self::parse_floating(raw)? {
            return Ok(floating);
        }

        let bytes = raw.as_bytes();
        let min_inclusive = bytes.first() == Some(&b'[');
        let max_inclusive = bytes.last() == Some(&b']');
        let has_brackets = matches!(bytes.first(), Some(b'[' | b'('))
            && matches!(bytes.last(), Some(b']' | b')'));

        if !has_brackets {
            let v = Version::parse(raw)?;
            return Ok(Self::exact(v));
        }

        let inner = &raw[1..raw.len() - 1];
        let mut parts = inner.splitn(2, ',');
        let lo = parts.next().unwrap_or("").trim();
        let hi = parts.next().unwrap_or("").trim();

        let min = if lo.is_empty() { None } else { Some(Version::parse(lo)?) };
        let max = if hi.is_empty() { None } else { Some(Version::parse(hi)?) };

        Ok(Self {
            min,
            max,
            min_inclusive,
            max_inclusive,
            float: FloatBehavior::None,
            is_reference: false,
        })
    }

    /// Recognises a trailing `-*` (pre-release floats) or a trailing `.*`
    /// component (everything from that point on floats); `None` if `raw`
    /// isn't a floating form at all.
    fn parse_floating(raw: &str) -> Result<Option<Self>> {
        if let Some(prefix) = raw.strip_suffix("-*") {
            let min = Version::parse(prefix)?;
            return Ok(Some(Self::floating(min, FloatBehavior::Prerelease)));
        }

        let parts: Vec<&str> = raw.split('.').collect();
        if parts.len() < 2 || *parts.last().unwrap() != "*" {
            return Ok(None);
        }
        let fixed = &parts[..parts.len() - 1];
        let behavior = match fixed.len() {
            1 => FloatBehavior::Minor,
            2 => FloatBehavior::Build,
            3 => FloatBehavior::Revision,
            _ => return Err(Error::InvalidRange { raw: raw.to_string() }),
        };
        let min = Version::parse(&fixed.join("."))?;
        Ok(Some(Self::floating(min, behavior)))
    }

    /// A floating range: `min` pins the fixed prefix, no upper bound (the
    /// floating components are free to be anything), per spec §4.1.
    fn floating(min: Version, float: FloatBehavior) -> Self {
        Self {
            min: Some(min),
            max: None,
            min_inclusive: true,
            max_inclusive: true,
            float,
            is_reference: false,
        }
    }
}
